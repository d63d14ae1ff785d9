use typetext::{
    reflect_abstract, reflect_enum, reflect_flags, reflect_interface, reflect_object,
    reflect_value, to_json, to_jsv, value, DataMember, Number, Reflect, Value, ValueMap,
};

#[test]
fn test_value_macro_null() {
    let value = value!(null);
    assert_eq!(value, Value::Null);
    assert_eq!(to_json(&value).unwrap(), "null");
    assert_eq!(to_jsv(&value).unwrap(), "");
}

#[test]
fn test_value_macro_booleans() {
    assert_eq!(value!(true), Value::Bool(true));
    assert_eq!(value!(false), Value::Bool(false));
}

#[test]
fn test_value_macro_numbers() {
    assert_eq!(value!(42), Value::Number(Number::Integer(42)));
    assert_eq!(value!(3.5), Value::Number(Number::Float(3.5)));
    assert_eq!(value!(-123), Value::Number(Number::Integer(-123)));
}

#[test]
fn test_value_macro_strings() {
    assert_eq!(value!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(value!(""), Value::String(String::new()));
}

#[test]
fn test_value_macro_arrays() {
    let empty = value!([]);
    assert_eq!(empty, Value::Array(vec![]));

    let mixed = value!([1, "two", true, null]);
    assert_eq!(to_json(&mixed).unwrap(), r#"[1,"two",true,null]"#);
    assert_eq!(to_jsv(&mixed).unwrap(), "[1,two,True,]");
}

#[test]
fn test_value_macro_objects() {
    let empty = value!({});
    assert_eq!(empty, Value::Object(ValueMap::new()));

    let user = value!({
        "name": "Alice",
        "roles": ["admin", "ops"],
        "address": { "city": "Oslo" }
    });
    assert_eq!(
        to_json(&user).unwrap(),
        r#"{"name":"Alice","roles":["admin","ops"],"address":{"city":"Oslo"}}"#
    );
    assert_eq!(
        to_jsv(&user).unwrap(),
        "{name:Alice,roles:[admin,ops],address:{city:Oslo}}"
    );
}

#[test]
fn test_value_macro_expressions() {
    let count = 3;
    let label = String::from("x,y");
    let doc = value!({ "count": count, "label": label });
    assert_eq!(to_jsv(&doc).unwrap(), r#"{count:3,label:"x,y"}"#);
}

struct Point {
    x: i32,
    y: i32,
}

reflect_object!(Point { x as "X", y as "Y" });

struct Shape {
    name: String,
    points: Vec<Point>,
    closed: bool,
}

reflect_object!(Shape { name, points, closed });

#[test]
fn test_reflect_object_names_and_nesting() {
    let shape = Shape {
        name: "tri".to_string(),
        points: vec![Point { x: 0, y: 0 }, Point { x: 1, y: 2 }],
        closed: true,
    };
    assert_eq!(
        to_json(&shape).unwrap(),
        r#"{"name":"tri","points":[{"X":0,"Y":0},{"X":1,"Y":2}],"closed":true}"#
    );
    assert_eq!(<Shape as Reflect>::describe().name(), "Shape");
}

struct Invoice {
    number: String,
    internal_id: u64,
    total: f64,
    currency: &'static str,
}

reflect_object!(Invoice contract {
    total: DataMember::new().order(2),
    number: DataMember::new().named("No").order(1),
    currency: DataMember::new(),
});

#[test]
fn test_reflect_object_contract() {
    let invoice = Invoice {
        number: "A-1".to_string(),
        internal_id: 77,
        total: 12.5,
        currency: "EUR",
    };
    assert_eq!(invoice.internal_id, 77);
    assert_eq!(
        to_json(&invoice).unwrap(),
        r#"{"currency":"EUR","No":"A-1","total":12.5}"#
    );
}

#[derive(Clone, Copy)]
enum Level {
    Low,
    High,
}

reflect_enum!(Level { Low, High });

#[test]
fn test_reflect_enum() {
    assert_eq!(to_json(&vec![Level::Low, Level::High]).unwrap(), r#"["Low","High"]"#);
    assert_eq!(to_jsv(&Level::High).unwrap(), "High");
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Mode: u8 {
        const A = 0b01;
        const B = 0b10;
    }
}

reflect_flags!(Mode: u8);

#[test]
fn test_reflect_flags() {
    assert_eq!(to_json(&(Mode::A | Mode::B)).unwrap(), "3");
    assert_eq!(to_jsv(&Mode::empty()).unwrap(), "0");
}

struct Version(u16, u16);

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

reflect_value!(Version);

#[test]
fn test_reflect_value() {
    assert_eq!(to_json(&Version(2, 10)).unwrap(), r#""2.10""#);
    assert_eq!(to_jsv(&vec![Version(1, 0)]).unwrap(), "[1.0]");
}

trait Event: Reflect {}

struct Started {
    at: i64,
}

struct Stopped {
    reason: Option<String>,
}

reflect_object!(Started { at });
reflect_object!(Stopped { reason });
impl Event for Started {}
impl Event for Stopped {}

reflect_interface!(Event);

#[test]
fn test_reflect_interface() {
    let events: Vec<Box<dyn Event>> = vec![
        Box::new(Started { at: 5 }),
        Box::new(Stopped { reason: None }),
    ];
    assert_eq!(
        to_jsv(&events).unwrap(),
        "[{__type:Started,at:5},{__type:Stopped}]"
    );
    assert_eq!(<Box<dyn Event> as Reflect>::describe().name(), "Event");
}

trait Account: Reflect {}

struct Savings {
    rate: f32,
}

reflect_object!(Savings { rate });
impl Account for Savings {}

reflect_abstract!(Account);

#[test]
fn test_reflect_abstract() {
    let account: Box<dyn Account> = Box::new(Savings { rate: 0.5 });
    assert_eq!(
        to_json(&account).unwrap(),
        r#"{"__type":"Savings","rate":0.5}"#
    );
}
