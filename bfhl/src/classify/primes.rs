//! Prime detection over numeric tokens.

/// Reads the integer at the start of `token`.
///
/// Leading whitespace and one optional sign are skipped, then the longest run of ASCII
/// digits is taken. Anything after the digits (a fractional part, an exponent, stray
/// characters) is ignored, so `"3.5"` reads as 3 and `"1e3"` as 1. Returns `None` when no
/// digit follows the sign or when the value does not fit in an `i64`.
pub fn leading_integer(token: &str) -> Option<i64> {
    let trimmed = token.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = unsigned.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(unsigned.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = unsigned[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Bases for the Miller-Rabin test. Together they make the test exact for every `u64`.
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    result
}

/// Whether odd `n` passes the strong probable-prime test to base `a`, where
/// `n - 1 = d * 2^s` with `d` odd.
fn passes_witness(n: u64, d: u64, s: u32, a: u64) -> bool {
    let mut x = pow_mod(a, d, n);
    if x == 1 || x == n - 1 {
        return true;
    }
    for _ in 1..s {
        x = mul_mod(x, x, n);
        if x == n - 1 {
            return true;
        }
    }
    false
}

/// Deterministic primality test.
///
/// Small factors are ruled out by division, then Miller-Rabin runs over [`WITNESSES`]. The
/// cost per call is a few hundred modular multiplications whatever the size of `n`.
pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    let n = n as u64;

    for p in WITNESSES {
        if n == p {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }
    // Every composite below 41 * 41 has a factor in WITNESSES
    if n < 41 * 41 {
        return true;
    }

    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;
    WITNESSES.iter().all(|&a| passes_witness(n, d, s, a))
}

/// Returns true as soon as any token's leading integer is prime.
pub fn contains_prime<S: AsRef<str>>(numeric: &[S]) -> bool {
    numeric
        .iter()
        .filter_map(|token| leading_integer(token.as_ref()))
        .any(is_prime)
}
