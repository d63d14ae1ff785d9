//! Customizing output with Options.
//!
//! Run with: cargo run --example custom_options

use chrono::{TimeZone, Utc};
use std::error::Error;
use typetext::{reflect_object, Engine, Format, Options};
use uuid::Uuid;

struct Price {
    cents: i64,
}

reflect_object!(Price { cents });

struct Order {
    order_id: Uuid,
    placed_at: chrono::DateTime<Utc>,
    customer_name: String,
    coupon_code: Option<String>,
    total: Price,
    item_count: u32,
}

reflect_object!(Order { order_id, placed_at, customer_name, coupon_code, total, item_count });

fn main() -> Result<(), Box<dyn Error>> {
    let order = Order {
        order_id: Uuid::from_u128(0x1234_5678_9abc_def0),
        placed_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        customer_name: "Ann".to_string(),
        coupon_code: None,
        total: Price { cents: 4250 },
        item_count: 3,
    };

    println!("Default:");
    println!("{}\n", Engine::default().serialize(&order, Format::Json)?);

    println!("Camel case, nulls included:");
    let engine = Engine::new(
        Options::new()
            .with_camel_case_names(true)
            .with_include_null_values(true),
    );
    println!("{}\n", engine.serialize(&order, Format::Json)?);

    println!("Custom hooks:");
    let engine = Engine::new(
        Options::new()
            .with_serialize_fn::<Price>(|p| format!("{}.{:02} EUR", p.cents / 100, p.cents % 100))
            .with_raw_serialize_fn::<u32>(|n| format!("{:#x}", n)),
    );
    println!("{}\n", engine.serialize(&order, Format::Json)?);
    println!("{}", engine.serialize(&order, Format::Jsv)?);

    Ok(())
}
