//! Randomized client fingerprints
//!
//! A fingerprint is the User-Agent plus accept-header combination attached
//! to one synthetic request. Generation is stateless: every function is a
//! pure function of the supplied random source, and a fresh fingerprint is
//! drawn for every request. No invariant ties the browser family to the
//! accept fragment; the randomization exists only to vary the observable
//! per-request identity.

use chrono::{Datelike, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::Target;

const MACINTOSH_TOKENS: &[&str] = &["68K", "PPC", "Intel Mac OS X"];

const WINDOWS_TOKENS: &[&str] = &[
    "Win3.11",
    "WinNT3.51",
    "WinNT4.0",
    "Windows NT 5.0",
    "Windows NT 5.1",
    "Windows NT 5.2",
    "Windows NT 6.0",
    "Windows NT 6.1",
    "Windows NT 6.2",
    "Win 9x 4.90",
    "WindowsCE",
    "Windows XP",
    "Windows 7",
    "Windows 8",
    "Windows NT 10.0; Win64; x64",
];

const X11_TOKENS: &[&str] = &["Linux i686", "Linux x86_64"];

const IE_FEATURE_TOKENS: &[&str] = &[
    ".NET CLR",
    "SV1",
    "Tablet PC",
    "Win64; IA64",
    "Win64; x64",
    "WOW64",
];

/// Accept-family header fragments, one chosen uniformly per request.
///
/// Every fragment is a complete set of CRLF-terminated header lines.
const ACCEPT_FRAGMENTS: &[&str] = &[
    "Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8\r\nAccept-Language: en-US,en;q=0.5\r\nAccept-Encoding: gzip, deflate\r\n",
    "Accept-Encoding: gzip, deflate\r\n",
    "Accept-Language: en-US,en;q=0.5\r\nAccept-Encoding: gzip, deflate\r\n",
    "Accept: text/html, application/xhtml+xml, application/xml;q=0.9, */*;q=0.8\r\nAccept-Language: en-US,en;q=0.5\r\nAccept-Charset: iso-8859-1\r\nAccept-Encoding: gzip\r\n",
    "Accept: application/xml,application/xhtml+xml,text/html;q=0.9, text/plain;q=0.8,image/png,*/*;q=0.5\r\nAccept-Charset: iso-8859-1\r\n",
    "Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8\r\nAccept-Encoding: br;q=1.0, gzip;q=0.8, *;q=0.1\r\nAccept-Language: utf-8, iso-8859-1;q=0.5, *;q=0.1\r\nAccept-Charset: utf-8, iso-8859-1;q=0.5\r\n",
    "Accept: image/jpeg, application/x-ms-application, image/gif, application/xaml+xml, image/pjpeg, application/x-ms-xbap, application/x-shockwave-flash, application/msword, */*\r\nAccept-Language: en-US,en;q=0.5\r\n",
    "Accept: text/html, application/xhtml+xml, image/jxr, */*\r\nAccept-Encoding: gzip\r\nAccept-Charset: utf-8, iso-8859-1;q=0.5\r\nAccept-Language: utf-8, iso-8859-1;q=0.5, *;q=0.1\r\n",
    "Accept: text/html, application/xml;q=0.9, application/xhtml+xml, image/png, image/webp, image/jpeg, image/gif, image/x-xbitmap, */*;q=0.1\r\nAccept-Encoding: gzip\r\nAccept-Language: en-US,en;q=0.5\r\nAccept-Charset: utf-8, iso-8859-1;q=0.5\r\n",
    "Accept: text/html, application/xhtml+xml, application/xml;q=0.9, */*;q=0.8\r\nAccept-Language: en-US,en;q=0.5\r\n",
    "Accept-Charset: utf-8, iso-8859-1;q=0.5\r\nAccept-Language: utf-8, iso-8859-1;q=0.5, *;q=0.1\r\n",
    "Accept: text/html, application/xhtml+xml\r\n",
    "Accept-Language: en-US,en;q=0.5\r\n",
    "Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8\r\nAccept-Encoding: br;q=1.0, gzip;q=0.8, *;q=0.1\r\n",
    "Accept: text/plain;q=0.8,image/png,*/*;q=0.5\r\nAccept-Charset: iso-8859-1\r\n",
];

/// How many years back the firefox Gecko build date may reach.
const GECKO_YEAR_SPAN: i32 = 5;

/// Generate a randomized User-Agent string.
///
/// Platform, OS token, and browser family are each drawn uniformly; the
/// rendered string always starts with `Mozilla/5.0`.
pub fn user_agent<R: Rng + ?Sized>(rng: &mut R) -> String {
    let os = match rng.gen_range(0..3) {
        0 => MACINTOSH_TOKENS.choose(rng),
        1 => WINDOWS_TOKENS.choose(rng),
        _ => X11_TOKENS.choose(rng),
    }
    .copied()
    .unwrap_or("Linux x86_64");

    match rng.gen_range(0..3) {
        0 => chrome_agent(os, rng),
        1 => firefox_agent(os, rng),
        _ => ie_agent(os, rng),
    }
}

/// Chrome-style agent: the webkit build number appears in both the
/// AppleWebKit and Safari tokens.
fn chrome_agent<R: Rng + ?Sized>(os: &str, rng: &mut R) -> String {
    let webkit = rng.gen_range(500..=599);
    let version = format!(
        "{}.0.{}.{}",
        rng.gen_range(0..=99),
        rng.gen_range(0..=9999),
        rng.gen_range(0..=999)
    );
    format!(
        "Mozilla/5.0 ({os}) AppleWebKit/{webkit}.0 (KHTML, like Gecko) Chrome/{version} Safari/{webkit}"
    )
}

/// Firefox-style agent with an 8-digit Gecko build date.
fn firefox_agent<R: Rng + ?Sized>(os: &str, rng: &mut R) -> String {
    let year = Utc::now().year() - rng.gen_range(0..=GECKO_YEAR_SPAN);
    let gecko = format!(
        "{year}{:02}{:02}",
        rng.gen_range(1..=12),
        rng.gen_range(1..=30)
    );
    let version = format!("{}.0", rng.gen_range(1..=72));
    format!("Mozilla/5.0 ({os}; rv:{version}) Gecko/{gecko} Firefox/{version}")
}

/// Trident-style agent, with a 50% chance of one compatibility token.
fn ie_agent<R: Rng + ?Sized>(os: &str, rng: &mut R) -> String {
    let version = format!("{}.0", rng.gen_range(1..=99));
    let engine = format!("{}.0", rng.gen_range(1..=99));
    let token = if rng.gen_bool(0.5) {
        IE_FEATURE_TOKENS
            .choose(rng)
            .map(|t| format!("{t}; "))
            .unwrap_or_default()
    } else {
        String::new()
    };
    format!("Mozilla/5.0 (compatible; MSIE {version}; {os}; {token}Trident/{engine})")
}

/// Assemble the full header block for one request.
///
/// Always includes `Connection: Keep-alive` and a freshly generated
/// `User-Agent`, followed by one accept fragment and a `Referer` built from
/// the target's scheme and host, terminated by the blank line that closes an
/// HTTP/1.1 header block.
pub fn header_block<R: Rng + ?Sized>(target: &Target, rng: &mut R) -> String {
    let accept = ACCEPT_FRAGMENTS.choose(rng).copied().unwrap_or("");
    format!(
        "Connection: Keep-alive\r\nUser-Agent: {}\r\n{}Referer: {}\r\n\r\n",
        user_agent(rng),
        accept,
        target.referer()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLES: usize = 500;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5173)
    }

    #[test]
    fn test_user_agent_shape() {
        let mut rng = rng();
        for _ in 0..SAMPLES {
            let ua = user_agent(&mut rng);
            assert!(ua.starts_with("Mozilla/5.0 ("), "unexpected prefix: {ua}");
            assert!(!ua.contains('\r') && !ua.contains('\n'));
        }
    }

    #[test]
    fn test_chrome_webkit_build_consistent() {
        let mut rng = rng();
        for _ in 0..SAMPLES {
            let ua = chrome_agent("Linux x86_64", &mut rng);

            let webkit: u32 = ua
                .split("AppleWebKit/")
                .nth(1)
                .and_then(|rest| rest.split(".0 (KHTML").next())
                .and_then(|n| n.parse().ok())
                .expect("AppleWebKit token");
            assert!((500..=599).contains(&webkit), "webkit out of range: {ua}");

            let safari: u32 = ua
                .split("Safari/")
                .nth(1)
                .and_then(|n| n.parse().ok())
                .expect("Safari token");
            assert_eq!(webkit, safari, "mismatched build numbers: {ua}");
        }
    }

    #[test]
    fn test_firefox_gecko_date_is_zero_padded() {
        let mut rng = rng();
        for _ in 0..SAMPLES {
            let ua = firefox_agent("Intel Mac OS X", &mut rng);
            let gecko = ua
                .split("Gecko/")
                .nth(1)
                .and_then(|rest| rest.split(' ').next())
                .expect("Gecko token");
            assert_eq!(gecko.len(), 8, "gecko date not 8 digits: {ua}");
            assert!(gecko.chars().all(|c| c.is_ascii_digit()));

            let month: u32 = gecko[4..6].parse().unwrap();
            let day: u32 = gecko[6..8].parse().unwrap();
            assert!((1..=12).contains(&month));
            assert!((1..=30).contains(&day));
        }
    }

    #[test]
    fn test_firefox_versions_match() {
        let mut rng = rng();
        for _ in 0..SAMPLES {
            let ua = firefox_agent("Linux i686", &mut rng);
            let rv = ua
                .split("rv:")
                .nth(1)
                .and_then(|rest| rest.split(')').next())
                .expect("rv token");
            assert!(ua.ends_with(&format!("Firefox/{rv}")), "versions differ: {ua}");
        }
    }

    #[test]
    fn test_ie_has_trident_and_at_most_one_feature_token() {
        let mut rng = rng();
        let mut with_token = 0usize;
        for _ in 0..SAMPLES {
            // Fixed X11 OS token so feature tokens cannot collide with the
            // OS portion of the string (e.g. "Windows NT 10.0; Win64; x64").
            let ua = ie_agent("Linux i686", &mut rng);
            assert!(ua.contains("; Trident/"), "missing engine token: {ua}");

            let tokens = IE_FEATURE_TOKENS
                .iter()
                .filter(|t| ua.contains(&format!("{t}; ")))
                .count();
            assert!(tokens <= 1, "more than one feature token: {ua}");
            with_token += tokens;
        }
        // 50% attach probability; generous deterministic bounds.
        assert!(with_token > SAMPLES / 5, "feature tokens almost never attached");
        assert!(with_token < SAMPLES * 4 / 5, "feature tokens almost always attached");
    }

    #[test]
    fn test_header_block_framing() {
        let target = Target::new("example.test", 443, "/");
        let mut rng = rng();
        for _ in 0..SAMPLES {
            let block = header_block(&target, &mut rng);
            assert!(block.starts_with("Connection: Keep-alive\r\n"));
            assert!(block.contains("\r\nUser-Agent: Mozilla/5.0"));
            assert!(block.contains("\r\nReferer: https://example.test\r\n"));
            assert!(block.ends_with("\r\n\r\n"));

            // Every line is CRLF-terminated: no bare '\n' or '\r' anywhere.
            for chunk in block.split("\r\n") {
                assert!(!chunk.contains('\n') && !chunk.contains('\r'));
            }
        }
    }

    #[test]
    fn test_accept_fragments_are_crlf_terminated() {
        for fragment in ACCEPT_FRAGMENTS {
            assert!(fragment.ends_with("\r\n"), "unterminated fragment: {fragment:?}");
            for line in fragment.trim_end_matches("\r\n").split("\r\n") {
                assert!(
                    line.starts_with("Accept"),
                    "unexpected header line: {line:?}"
                );
            }
        }
    }
}
