use race_counter::{init_logging, CounterVariant, Harness};

fn main() -> race_counter::Result<()> {
    init_logging();

    println!("--- Concurrency & Thread Safety Demo ---");

    let harness = Harness::default();
    for variant in CounterVariant::ALL {
        let report = harness.run_variant(variant)?;
        println!("{report}");
        if !variant.is_synchronized() {
            println!(
                "NOTE: If value < {}, a Race Condition occurred.\n",
                report.expected
            );
        }
    }

    Ok(())
}
