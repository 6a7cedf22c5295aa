use ax25_dial::address::{Address, Ax25Addr};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: {} <station> [digipeater...]", args[0]);
        println!("e.g. {} w1aw-2 RELAY WIDE1-1", args[0]);
        std::process::exit(1);
    }

    let addr = Ax25Addr::from_calls(&args[1], &args[2..]);
    println!("Station\t\t{}", addr.address());
    for (i, digi) in addr.digis().iter().enumerate() {
        println!("Digipeater {}\t{} (SSID {})", i + 1, digi, digi.ssid);
    }
    println!("Path\t\t{}", addr);

    let station: Address = args[1].parse().unwrap_or_default();
    if station.call != station.call.to_uppercase() {
        println!("Note: callsigns are compared exactly, '{}' is not upper case", station.call);
    }
}
