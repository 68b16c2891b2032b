//! Keeps base64 image payloads out of logs and error messages.

/// Runs at least this long are assumed to be encoded image data.
const REDACTION_THRESHOLD: usize = 100;

/// Replaces every run of base64 characters of 100+ chars with a size-only
/// placeholder, e.g. `[base64 image data - 12KB]`. Shorter runs (hashes,
/// tokens, ordinary words) pass through untouched.
pub fn redact_base64(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut run = String::new();
    for c in input.chars() {
        if is_base64_char(c) {
            run.push(c);
        } else {
            flush_run(&mut out, &mut run);
            out.push(c);
        }
    }
    flush_run(&mut out, &mut run);
    out
}

fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}

fn flush_run(out: &mut String, run: &mut String) {
    if run.len() >= REDACTION_THRESHOLD {
        let size_kb = (run.len() + 512) / 1024;
        out.push_str(&format!("[base64 image data - {size_kb}KB]"));
    } else {
        out.push_str(run);
    }
    run.clear();
}
