//! Modes command

use crate::ModesArgs;
use anyhow::Result;
use aquamark_core::Backend;
use aquamark_ops::{BlendEntry, BlendModeRegistry};

const BACKENDS: [Backend; 2] = [Backend::Accelerated, Backend::Scalar];

pub fn run(args: ModesArgs) -> Result<()> {
    for line in lines(args.quiet) {
        println!("{}", line);
    }
    Ok(())
}

fn lines(quiet: bool) -> Vec<String> {
    let entries = BlendModeRegistry.entries();
    if quiet {
        return entries.iter().map(|e| e.mode.key().to_string()).collect();
    }

    let mut out = vec![format!("{:<10} {:<12} {:<12}", "MODE", "ACCELERATED", "SCALAR")];
    out.extend(entries.iter().map(|e| {
        let [fast, slow] = BACKENDS.map(|b| strategy(e, b));
        format!("{:<10} {:<12} {:<12}", e.mode.key(), fast, slow)
    }));
    out
}

fn strategy(entry: &BlendEntry, backend: Backend) -> String {
    match entry.native {
        Some(op) if backend.native_ops().contains(&op) => format!("native:{:?}", op).to_lowercase(),
        _ => "manual".to_string(),
    }
}
