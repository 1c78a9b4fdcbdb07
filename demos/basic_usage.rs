// ============================================================================
// Basic Usage Example
// ============================================================================

use channel_float::prelude::*;
use std::sync::Arc;

fn main() {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Channel Float Example ===\n");

    let profile = Profile::basic();
    println!("Profile: {}\n", profile);

    // Encode native values
    println!("Encoding...");
    for value in [0.75, 0.0263671875, -0.1875, 0.0] {
        match encode_to_text(value, profile) {
            Ok(text) => println!("  {:>14} -> {}", value, text),
            Err(e) => println!("  {:>14} -> error: {}", value, e),
        }
    }

    // Parse operands from text
    let a = match parse(".11011e-111(+2)", profile) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("parse failed: {}", e);
            return;
        }
    };
    let b = match parse("-.11e-100(+2)", profile) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("parse failed: {}", e);
            return;
        }
    };

    // Multiply with a logging observer
    println!("\nMultiplying {} by {}...", a, b);
    let multiplier = Multiplier::new(Arc::new(LoggingObserver));
    match multiplier.multiply(&a, &b, true) {
        Ok(product) => {
            println!("  product: {}", product);
            println!("  decoded: {}", decode(&product));
            println!("  exact:   {}", decode(&a) * decode(&b));
            println!("\n{}", product.channel_dump());
        }
        Err(e) => eprintln!("multiply failed: {}", e),
    }

    // Same circuit on the extended profile
    let extended = Profile::extended();
    println!("\nProfile: {}", extended);
    if let (Ok(x), Ok(y)) = (encode(1.5, extended), encode(2.5, extended)) {
        if let Ok(product) = multiply(&x, &y, true) {
            println!("  {} x {} = {} ({})", x, y, product, decode(&product));
        }
    }

    println!("\n=== Example Complete ===");
}
