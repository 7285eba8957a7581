use clap::Parser;

use super::ProbeArgs;
use super::parsers::{parse_duration_secs, parse_positive_u64, parse_positive_usize};

fn parse_args(args: &[&str]) -> Result<ProbeArgs, String> {
    let mut full = vec!["serprobe"];
    full.extend_from_slice(args);
    ProbeArgs::try_parse_from(full).map_err(|err| format!("parse failed: {}", err))
}

#[test]
fn defaults_are_applied() -> Result<(), String> {
    let args = parse_args(&[])?;
    if args.requests_per_target.get() != 10 {
        return Err(format!(
            "expected 10 requests per target, got {}",
            args.requests_per_target.get()
        ));
    }
    if args.concurrency.get() != 10 {
        return Err(format!("expected concurrency 10, got {}", args.concurrency.get()));
    }
    if args.rate_per_sec != 0 {
        return Err(format!("expected rate 0, got {}", args.rate_per_sec));
    }
    if args.batch_size.get() != 1000 {
        return Err(format!("expected batch size 1000, got {}", args.batch_size.get()));
    }
    if args.no_detail {
        return Err("detail logging should default to enabled".to_owned());
    }
    Ok(())
}

#[test]
fn engines_are_repeatable() -> Result<(), String> {
    let args = parse_args(&["-e", "google", "-e", "bing"])?;
    if args.engines != vec!["google".to_owned(), "bing".to_owned()] {
        return Err(format!("unexpected engines: {:?}", args.engines));
    }
    Ok(())
}

#[test]
fn zero_concurrency_is_rejected() -> Result<(), String> {
    if parse_args(&["-c", "0"]).is_ok() {
        return Err("expected error for zero concurrency".to_owned());
    }
    Ok(())
}

#[test]
fn zero_requests_per_target_is_rejected() -> Result<(), String> {
    if parse_args(&["-n", "0"]).is_ok() {
        return Err("expected error for zero request count".to_owned());
    }
    Ok(())
}

#[test]
fn zero_timeout_is_rejected() -> Result<(), String> {
    if parse_args(&["--request-timeout", "0"]).is_ok() {
        return Err("expected error for zero timeout".to_owned());
    }
    Ok(())
}

#[test]
fn positive_parsers_reject_garbage() -> Result<(), String> {
    if parse_positive_u64("abc").is_ok() {
        return Err("expected error for non-numeric u64".to_owned());
    }
    if parse_positive_usize("-1").is_ok() {
        return Err("expected error for negative usize".to_owned());
    }
    if parse_duration_secs("1.5").is_ok() {
        return Err("expected error for fractional duration".to_owned());
    }
    Ok(())
}
