//! Type discriminators on interface and abstract declarations.
//!
//! Run with: cargo run --example polymorphic

use std::error::Error;
use typetext::{
    reflect_abstract, reflect_interface, reflect_object, to_json, to_jsv, Engine, Format, Options,
    Reflect,
};

trait Shape: Reflect {}

struct Circle {
    radius: f64,
}

struct Rect {
    width: f64,
    height: f64,
}

reflect_object!(Circle { radius as "Radius" });
reflect_object!(Rect { width as "Width", height as "Height" });
impl Shape for Circle {}
impl Shape for Rect {}
reflect_interface!(Shape);

trait Layer: Reflect {}

struct Drawing {
    name: String,
    shapes: Vec<Box<dyn Shape>>,
}

reflect_object!(Drawing { name as "Name", shapes as "Shapes" });
impl Layer for Drawing {}
reflect_abstract!(Layer);

fn main() -> Result<(), Box<dyn Error>> {
    let layer: Box<dyn Layer> = Box::new(Drawing {
        name: "sketch".to_string(),
        shapes: vec![
            Box::new(Circle { radius: 1.5 }),
            Box::new(Rect {
                width: 2.0,
                height: 0.5,
            }),
        ],
    });

    println!("JSON:\n{}\n", to_json(&layer)?);
    println!("JSV:\n{}\n", to_jsv(&layer)?);

    let renamed = Engine::new(Options::new().with_type_attr("$type"));
    println!("Renamed discriminator:\n{}\n", renamed.serialize(&layer, Format::Json)?);

    let plain = Engine::new(Options::new().exclude_type_info_for::<Box<dyn Layer>>());
    println!("Abstract layer excluded:\n{}", plain.serialize(&layer, Format::Json)?);

    Ok(())
}
