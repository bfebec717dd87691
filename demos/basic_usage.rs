// ============================================================================
// Basic Usage Example
// ============================================================================

use chrono::{Duration, TimeZone, Utc};
use fill_analytics::interfaces::RecordingExecution;
use fill_analytics::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

fn main() {
    println!("=== Fill Analytics Example ===\n");

    // Average prices through the one-shot function
    let messages = [
        "new 1 AAPL buy 100 10.00",
        "new 5 MSFT sell 20 300.00",
        "fill 1 40 10.00",
        "modify 2 1 60 10.50",
        "fill 5 20 301.00",
        "fill 2 60 10.25",
        "fill 99 1 1.00", // unknown order, skipped
    ];

    println!("Messages:");
    for message in &messages {
        println!("  {}", message);
    }

    println!("\nAverage prices:");
    for line in average_prices(&messages) {
        println!("  {}", line);
    }

    // Streaming processor with logging events and 4 decimals
    println!("\n=== Streaming Processor ===");
    let config = ProcessorConfig::lenient().with_price_decimals(4);
    let mut processor = AveragePriceProcessor::new(config, Arc::new(LoggingEventHandler))
        .expect("valid configuration");

    processor
        .process_lines(["new 10 ESZ5 buy 3 4500.25", "fill 10 1 4500.00", "fill 10 2 4500.25"])
        .expect("lenient processing never fails");

    for chain in processor.summaries() {
        println!(
            "  chain {} {} {}: filled {} open {} avg {:?} complete={}",
            chain.root,
            chain.symbol,
            chain.side,
            chain.filled_quantity,
            chain.open_quantity,
            chain.average_price,
            chain.complete
        );
    }
    for line in processor.report() {
        println!("  report: {}", line);
    }

    // Standalone benchmarks
    println!("\n=== VWAP / TWAP ===");
    let mut vwap = VwapAccumulator::new();
    vwap.add(Decimal::new(10000, 2), 300).expect("no overflow");
    vwap.add(Decimal::new(10050, 2), 100).expect("no overflow");
    println!("  VWAP: {:?}", vwap.vwap());

    let start = Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap();
    let mut twap = TwapAccumulator::new();
    twap.add(start, Decimal::from(100)).expect("in order");
    twap.add(start + Duration::seconds(30), Decimal::from(102))
        .expect("in order");
    println!(
        "  TWAP over one minute: {:?}",
        twap.twap_until(start + Duration::seconds(60))
    );

    // Quoting around a theoretical price
    println!("\n=== Instrument Quoter ===");
    let execution = Arc::new(RecordingExecution::new());
    let config = QuoterConfig::new("ESZ5", Decimal::ONE, 10, Decimal::new(25, 2));
    let mut quoter = InstrumentQuoter::new(config, execution.clone()).expect("valid quoter config");

    quoter.on_theoretical_price(Decimal::from(100));
    quoter.on_order_add_confirm(1);
    quoter.on_order_add_confirm(2);
    quoter.on_best_bid_offer(Decimal::from(98), Decimal::new(9875, 2));

    for request in execution.requests() {
        println!("  {:?}", request);
    }
}
