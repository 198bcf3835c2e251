use clap::Parser;
use clap::error::ErrorKind;
use hashpipe::engine::arg_parser::VERSION_LINE;
use hashpipe::engine::{
    Algorithm, Cli, digest_stream, hex_equals, new_accumulator, parse_manifest, parse_manifest_line,
};
use hashpipe::pipeline::{Collector, pipeline_tuning, render_result};
use hashpipe::utils::hashpipe_toml::{apply_file_to_opts, parse_hashpipe_toml};
use hashpipe::{
    HashpipeError, Mode, Opts, Outcome, OutputOrder, PipelineConfig, ResultItem,
    coerce_concurrency,
};
use std::io::Cursor;
use std::path::PathBuf;

fn digest_hex(algorithm: Algorithm, data: &[u8]) -> String {
    let mut acc = algorithm.accumulator();
    acc.write(data);
    hex::encode(acc.sum())
}

// --- Algorithm names ---

#[test]
fn test_algorithm_parse_case_insensitive() {
    assert_eq!("sha256".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
    assert_eq!("SHA256".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
    assert_eq!("Md5".parse::<Algorithm>().unwrap(), Algorithm::Md5);
    assert_eq!("CRC32".parse::<Algorithm>().unwrap(), Algorithm::Crc32);
}

#[test]
fn test_algorithm_parse_unknown() {
    let err = "foo".parse::<Algorithm>().unwrap_err();
    assert!(matches!(err, HashpipeError::UnsupportedAlgorithm(ref s) if s == "foo"));
    assert!(new_accumulator("sha3").is_err());
    assert!(new_accumulator("").is_err());
}

#[test]
fn test_algorithm_name_round_trip() {
    for a in Algorithm::ALL {
        assert_eq!(a.name().parse::<Algorithm>().unwrap(), a);
        assert_eq!(a.to_string(), a.name());
    }
}

// --- Known digests ---

#[test]
fn test_known_digests() {
    assert_eq!(
        digest_hex(Algorithm::Sha256, b"hello"),
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
    assert_eq!(
        digest_hex(Algorithm::Md5, b""),
        "d41d8cd98f00b204e9800998ecf8427e"
    );
    assert_eq!(
        digest_hex(Algorithm::Md5, b"abc"),
        "900150983cd24fb0d6963f7d28e17f72"
    );
    assert_eq!(
        digest_hex(Algorithm::Sha1, b"abc"),
        "a9993e364706816aba3e25717850c26c9cd0d89d"
    );
    assert_eq!(
        digest_hex(Algorithm::Sha224, b"abc"),
        "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
    );
    assert_eq!(
        digest_hex(Algorithm::Sha384, b"abc"),
        "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7"
    );
    assert_eq!(
        digest_hex(Algorithm::Sha512, b"abc"),
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
    );
}

#[test]
fn test_crc32_big_endian_check_value() {
    assert_eq!(digest_hex(Algorithm::Crc32, b"123456789"), "cbf43926");
}

#[test]
fn test_digest_width_and_determinism() {
    let data = b"the quick brown fox jumps over the lazy dog";
    for a in Algorithm::ALL {
        let first = digest_hex(a, data);
        let second = digest_hex(a, data);
        assert_eq!(first, second, "{a} not deterministic");
        assert_eq!(first.len(), a.output_size() * 2, "{a} width");
        assert_eq!(a.accumulator().output_size(), a.output_size());
    }
}

#[test]
fn test_sum_is_idempotent_and_incremental() {
    for a in Algorithm::ALL {
        let mut acc = a.accumulator();
        acc.write(b"hel");
        acc.write(b"lo");
        let once = acc.sum();
        assert_eq!(acc.sum(), once);
        assert_eq!(hex::encode(&once), digest_hex(a, b"hello"));
    }
}

#[test]
fn test_reset_returns_to_zero_state() {
    for a in Algorithm::ALL {
        let mut acc = a.accumulator();
        acc.write(b"something else entirely");
        acc.reset();
        acc.write(b"hello");
        assert_eq!(hex::encode(acc.sum()), digest_hex(a, b"hello"));
    }
}

#[test]
fn test_digest_stream_small_chunks() {
    let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let mut acc = Algorithm::Sha256.accumulator();
    let n = digest_stream(&mut Cursor::new(&data), acc.as_mut(), 7).unwrap();
    assert_eq!(n, data.len() as u64);
    assert_eq!(hex::encode(acc.sum()), digest_hex(Algorithm::Sha256, &data));
}

#[test]
fn test_hex_equals_ignores_case() {
    let digest = [0xabu8, 0xcd, 0x01];
    assert!(hex_equals(&digest, "abcd01"));
    assert!(hex_equals(&digest, "ABCD01"));
    assert!(!hex_equals(&digest, "abcd02"));
    assert!(!hex_equals(&digest, "abcd"));
}

// --- Manifest parsing ---

#[test]
fn test_parse_manifest_line_ok() {
    let r = parse_manifest_line("sha256 2cf24dba a.txt", 1).unwrap();
    assert_eq!(r.algorithm, "sha256");
    assert_eq!(r.digest_hex, "2cf24dba");
    assert_eq!(r.path, "a.txt");
    assert_eq!(r.to_line(), "sha256 2cf24dba a.txt");
}

#[test]
fn test_parse_manifest_line_wrong_field_count() {
    for line in ["sha256 abc", "sha256", "sha256 abc a.txt extra", "a b c d"] {
        let err = parse_manifest_line(line, 3).unwrap_err();
        assert!(
            matches!(err, HashpipeError::ManifestParse { line: 3, ref content } if content == line),
            "{line:?} should fail"
        );
    }
}

#[test]
fn test_parse_manifest_line_double_space_rejected() {
    assert!(parse_manifest_line("sha256  abc a.txt", 1).is_err());
    assert!(parse_manifest_line("sha256 abc ", 1).is_err());
}

#[test]
fn test_parse_manifest_skips_empty_lines_and_crlf() {
    let text = "md5 aa x\r\n\nsha1 bb y\n";
    let records = parse_manifest(Cursor::new(text)).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].path, "x");
    assert_eq!(records[1].algorithm, "sha1");
}

#[test]
fn test_parse_manifest_reports_line_number() {
    let text = "md5 aa x\nbroken\nsha1 bb y\n";
    let err = parse_manifest(Cursor::new(text)).unwrap_err();
    assert!(matches!(err, HashpipeError::ManifestParse { line: 2, .. }));
}

// --- Config ---

#[test]
fn test_coerce_concurrency() {
    assert_eq!(coerce_concurrency(0), 1);
    assert_eq!(coerce_concurrency(-5), 1);
    assert_eq!(coerce_concurrency(1), 1);
    assert_eq!(coerce_concurrency(12), 12);
}

#[test]
fn test_pipeline_config_new_coerces() {
    let c = PipelineConfig::new(Algorithm::Md5, 0, 0, Mode::Hash);
    assert_eq!(c.concurrency, 1);
    assert_eq!(c.chunk_size, 1);
    assert_eq!(c.order, OutputOrder::Arrival);
}

#[test]
fn test_config_from_opts() {
    let opts = Opts {
        algorithm: Algorithm::Sha1,
        jobs: -1,
        chunk_size: 4096,
        keep_order: true,
        strict: false,
        verbose: false,
        check: true,
    };
    let c = PipelineConfig::from(&opts);
    assert_eq!(c.algorithm, Algorithm::Sha1);
    assert_eq!(c.concurrency, 1);
    assert_eq!(c.chunk_size, 4096);
    assert_eq!(c.mode, Mode::Verify);
    assert_eq!(c.order, OutputOrder::Input);
}

#[test]
fn test_tuning_channel_cap_at_least_one() {
    let t = pipeline_tuning(&PipelineConfig::new(Algorithm::Md5, 1, 1024, Mode::Hash));
    assert_eq!(t.num_workers, 1);
    assert!(t.channel_cap >= 1);
}

#[test]
fn test_settings_file_applies_present_fields() {
    let file = parse_hashpipe_toml("[settings]\nhash = \"MD5\"\njobs = 3\nkeep_order = true\n")
        .unwrap();
    let mut opts = Opts::default();
    let before_chunk = opts.chunk_size;
    apply_file_to_opts(&file, &mut opts).unwrap();
    assert_eq!(opts.algorithm, Algorithm::Md5);
    assert_eq!(opts.jobs, 3);
    assert!(opts.keep_order);
    assert_eq!(opts.chunk_size, before_chunk);
}

#[test]
fn test_settings_file_unknown_algorithm() {
    let file = parse_hashpipe_toml("[settings]\nhash = \"foo\"\n").unwrap();
    let mut opts = Opts::default();
    assert!(apply_file_to_opts(&file, &mut opts).is_err());
}

#[test]
fn test_settings_file_empty() {
    let file = parse_hashpipe_toml("").unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts).unwrap();
    assert_eq!(opts.algorithm, Algorithm::Sha256);
}

// --- Rendering and collection ---

fn result(index: usize, identity: Option<&str>, matched: Option<bool>) -> ResultItem {
    ResultItem {
        index,
        identity: identity.map(String::from),
        algorithm: Algorithm::Md5,
        digest: vec![0xd4, 0x1d],
        matched,
    }
}

#[test]
fn test_render_hash_named() {
    assert_eq!(
        render_result(&result(0, Some("a.txt"), None), Mode::Hash),
        "md5 d41d a.txt"
    );
}

#[test]
fn test_render_hash_stdin() {
    assert_eq!(render_result(&result(0, None, None), Mode::Hash), "d41d");
}

#[test]
fn test_render_verify() {
    assert_eq!(
        render_result(&result(0, Some("a.txt"), Some(true)), Mode::Verify),
        "a.txt true"
    );
    assert_eq!(
        render_result(&result(0, Some("a.txt"), Some(false)), Mode::Verify),
        "a.txt false"
    );
}

#[test]
fn test_render_round_trips_through_manifest_parser() {
    let line = render_result(&result(0, Some("dir/a.txt"), None), Mode::Hash);
    let record = parse_manifest_line(&line, 1).unwrap();
    assert_eq!(record.algorithm, "md5");
    assert_eq!(record.digest_hex, "d41d");
    assert_eq!(record.path, "dir/a.txt");
}

#[test]
fn test_collector_input_order_buffers_and_skips_drops() {
    let mut out = Vec::new();
    let mut c = Collector::new(&mut out, Mode::Hash, OutputOrder::Input);
    c.accept(Outcome::Digested(result(2, Some("c"), None))).unwrap();
    c.accept(Outcome::Dropped(1)).unwrap();
    c.accept(Outcome::Digested(result(3, Some("d"), None))).unwrap();
    c.accept(Outcome::Digested(result(0, Some("a"), None))).unwrap();
    let stats = c.finish().unwrap();
    assert_eq!(stats.written, 3);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "md5 d41d a\nmd5 d41d c\nmd5 d41d d\n"
    );
}

#[test]
fn test_collector_arrival_order_writes_immediately() {
    let mut out = Vec::new();
    let mut c = Collector::new(&mut out, Mode::Verify, OutputOrder::Arrival);
    c.accept(Outcome::Digested(result(1, Some("b"), Some(false)))).unwrap();
    c.accept(Outcome::Dropped(2)).unwrap();
    c.accept(Outcome::Digested(result(0, Some("a"), Some(true)))).unwrap();
    let stats = c.finish().unwrap();
    assert_eq!(stats.written, 2);
    assert_eq!(stats.mismatches, 1);
    assert_eq!(String::from_utf8(out).unwrap(), "b false\na true\n");
}

// --- Command line ---

fn parse_cli(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("hashpipe").chain(args.iter().copied()))
}

#[test]
fn test_cli_switches_leave_files_positional() {
    let cli = parse_cli(&["-k", "a.txt", "b.txt"]).unwrap();
    assert_eq!(cli.keep_order, Some(true));
    assert_eq!(cli.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);

    let cli = parse_cli(&["-v", "a.txt"]).unwrap();
    assert_eq!(cli.verbose, Some(true));
    assert_eq!(cli.files, vec![PathBuf::from("a.txt")]);

    let cli = parse_cli(&["-c", "--strict", "m.txt"]).unwrap();
    assert!(cli.check);
    assert_eq!(cli.strict, Some(true));
    assert_eq!(cli.files, vec![PathBuf::from("m.txt")]);
}

#[test]
fn test_cli_switch_explicit_value_needs_equals() {
    let cli = parse_cli(&["--keep-order=false", "--strict=false", "a.txt"]).unwrap();
    assert_eq!(cli.keep_order, Some(false));
    assert_eq!(cli.strict, Some(false));
    assert_eq!(cli.files, vec![PathBuf::from("a.txt")]);

    let cli = parse_cli(&["a.txt"]).unwrap();
    assert_eq!(cli.keep_order, None);
    assert_eq!(cli.strict, None);
    assert_eq!(cli.verbose, None);
}

#[test]
fn test_cli_unknown_algorithm_rejected_at_parse() {
    let err = parse_cli(&["-h", "foo", "a.txt"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn test_cli_short_h_selects_algorithm() {
    let cli = parse_cli(&["-h", "SHA1", "a.txt"]).unwrap();
    assert_eq!(cli.hash, Some(Algorithm::Sha1));
    let cli = parse_cli(&["--hash", "crc32"]).unwrap();
    assert_eq!(cli.hash, Some(Algorithm::Crc32));
    assert!(cli.files.is_empty());
}

#[test]
fn test_cli_help_only_on_long_flag() {
    let err = parse_cli(&["--help"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    // `-h` alone is the algorithm flag missing its value, not help.
    let err = parse_cli(&["-h"]).unwrap_err();
    assert_ne!(err.kind(), ErrorKind::DisplayHelp);
}

#[test]
fn test_cli_nonpositive_jobs_accepted() {
    let cli = parse_cli(&["-j", "-1", "a.txt"]).unwrap();
    assert_eq!(cli.jobs, Some(-1));
    assert_eq!(coerce_concurrency(cli.jobs.unwrap()), 1);
    let cli = parse_cli(&["-j", "0"]).unwrap();
    assert_eq!(cli.jobs, Some(0));
    assert_eq!(coerce_concurrency(cli.jobs.unwrap()), 1);
}

#[test]
fn test_cli_version_prints_copyright() {
    let err = parse_cli(&["--version"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    let text = err.to_string();
    assert!(text.contains(VERSION_LINE), "{text}");
    assert!(text.contains("Copyright"));
}
