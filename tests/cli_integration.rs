use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{sentence_count, TestFixture};

const SPLITS: [&str; 3] = ["train", "dev", "test"];

fn counts(fixture: &TestFixture, prefix: &str) -> [usize; 3] {
    SPLITS.map(|split| sentence_count(&fixture.read_output(prefix, split)))
}

#[test]
fn test_ten_sentences_default_sizes() {
    let fixture = TestFixture::new();
    let input = fixture.create_numbered_corpus("corpus.tag", 10);

    let output = fixture.run(&input, "", &["--seed", "42"]);
    assert!(
        output.status.success(),
        "tagsplit failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(counts(&fixture, ""), [8, 1, 1]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sentences read: 10"));
    assert!(!stdout.contains("Dropped"));
}

#[test]
fn test_ten_sentences_shuffle_strategy() {
    let fixture = TestFixture::new();
    let input = fixture.create_numbered_corpus("corpus.tag", 10);

    let output = fixture.run(&input, "", &["-s", "42", "--strategy", "shuffle"]);
    assert!(output.status.success());
    assert_eq!(counts(&fixture, ""), [8, 1, 1]);
}

#[test]
fn test_seed_42_outputs_are_fixed() {
    let fixture = TestFixture::new();
    let input = fixture.create_numbered_corpus("corpus.tag", 10);
    let sentence = |i: usize| format!("word{i} NN B-NP\n. PUNCT O\n\n");
    let text = |indices: &[usize]| indices.iter().map(|i| sentence(*i)).collect::<String>();

    assert!(fixture.run(&input, "stream-", &["-s", "42"]).status.success());
    assert_eq!(fixture.read_output("stream-", "train"), text(&[0, 1, 2, 3, 4, 5, 6, 8]));
    assert_eq!(fixture.read_output("stream-", "dev"), text(&[7]));
    assert_eq!(fixture.read_output("stream-", "test"), text(&[9]));

    let args = ["-s", "42", "--strategy", "shuffle"];
    assert!(fixture.run(&input, "shuffle-", &args).status.success());
    assert_eq!(fixture.read_output("shuffle-", "train"), text(&[8, 6, 3, 2, 1, 5, 9, 7]));
    assert_eq!(fixture.read_output("shuffle-", "dev"), text(&[4]));
    assert_eq!(fixture.read_output("shuffle-", "test"), text(&[0]));
}

#[test]
fn test_missing_final_blank_line_shrinks_quotas() {
    let fixture = TestFixture::new();
    let mut text = fs::read_to_string(fixture.create_numbered_corpus("full.tag", 10)).unwrap();
    text.truncate(text.len() - 1);
    let input = fixture.create_corpus("corpus.tag", &text);

    let output = fixture.run(&input, "", &["-s", "42"]);
    assert!(output.status.success());

    // Nine terminating blank lines: quotas 7/1/1 and one sentence left over
    assert_eq!(counts(&fixture, ""), [7, 1, 1]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sentences read: 10"));
    assert!(stdout.contains("Dropped: 1"));
}

#[test]
fn test_three_sentences_drop_one() {
    let fixture = TestFixture::new();
    let input = fixture.create_numbered_corpus("corpus.tag", 3);

    let output = fixture.run(&input, "", &["--seed", "42"]);
    assert!(output.status.success());

    assert_eq!(counts(&fixture, ""), [2, 0, 0]);
    assert_eq!(fixture.read_output("", "dev"), "");
    assert_eq!(fixture.read_output("", "test"), "");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Dropped: 1"));
}

#[test]
fn test_empty_input_creates_empty_outputs() {
    let fixture = TestFixture::new();
    let input = fixture.create_corpus("empty.tag", "");

    for strategy in ["streaming", "shuffle"] {
        let output = fixture.run(&input, strategy, &["-s", "1", "--strategy", strategy]);
        assert!(output.status.success(), "{strategy} failed on empty input");
        for split in SPLITS {
            assert_eq!(fixture.read_output(strategy, split), "");
        }
    }
}

#[test]
fn test_runs_are_byte_identical() {
    let fixture = TestFixture::new();
    let input = fixture.create_numbered_corpus("corpus.tag", 200);

    for strategy in ["streaming", "shuffle"] {
        let first = format!("{strategy}-a-");
        let second = format!("{strategy}-b-");
        let args = ["--seed", "2024", "--strategy", strategy];
        assert!(fixture.run(&input, &first, &args).status.success());
        assert!(fixture.run(&input, &second, &args).status.success());

        for split in SPLITS {
            let a = fs::read(fixture.output(&first, split)).unwrap();
            let b = fs::read(fixture.output(&second, split)).unwrap();
            assert_eq!(a, b, "{strategy} {split} differs between runs");
        }
    }
}

#[test]
fn test_outputs_reproduce_input_tokens() {
    let fixture = TestFixture::new();
    let input = fixture.create_corpus(
        "corpus.tag",
        "Der ART B-NP\nHund\tNN  I-NP\n\nbellt VVFIN O\n\n\nlaut ADJD O\n. $. O\n\nEnde NN\n\nja PTKANT\n\nnein PTKANT\n\ngut ADJD\n\nso ADV\n\nnun ADV\n\nwo PWAV",
    );

    let output = fixture.run(&input, "", &["-s", "5"]);
    assert!(output.status.success());

    let expected: BTreeSet<String> = fs::read_to_string(&input)
        .unwrap()
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect();
    let written: BTreeSet<String> = SPLITS
        .iter()
        .flat_map(|split| {
            fixture
                .read_output("", split)
                .lines()
                .filter(|l| !l.is_empty())
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .collect();

    // 10 sentences at 0.8/0.1/0.1 leave nothing behind
    assert_eq!(counts(&fixture, "").iter().sum::<usize>(), 10);
    assert_eq!(written, expected);
}

#[test]
fn test_half_to_even_rounding_boundaries() {
    let fixture = TestFixture::new();

    // 5 * 0.1 = 0.5 rounds to 0; 25 * 0.1 = 2.5 rounds to 2
    let five = fixture.create_numbered_corpus("five.tag", 5);
    assert!(fixture.run(&five, "five-", &["-s", "3"]).status.success());
    assert_eq!(counts(&fixture, "five-"), [4, 0, 0]);

    let twenty_five = fixture.create_numbered_corpus("twenty_five.tag", 25);
    assert!(fixture
        .run(&twenty_five, "tf-", &["-s", "3", "--strategy", "shuffle"])
        .status
        .success());
    assert_eq!(counts(&fixture, "tf-"), [20, 2, 2]);
}

#[test]
fn test_out_of_range_size_rejected_before_output() {
    let fixture = TestFixture::new();
    let input = fixture.create_numbered_corpus("corpus.tag", 10);

    for bad in [["-t", "1.5"], ["-d", "0"], ["-e", "-0.2"], ["-t", "abc"]] {
        let mut args = vec!["-s", "1"];
        args.extend(bad);
        let output = fixture.run(&input, "", &args);
        assert!(!output.status.success(), "{bad:?} should be rejected");
        for split in SPLITS {
            assert!(!fixture.output("", split).exists());
        }
    }
}

#[test]
fn test_oversubscribed_sizes_rejected_before_output() {
    let fixture = TestFixture::new();
    let input = fixture.create_numbered_corpus("corpus.tag", 10);

    let output = fixture.run(&input, "", &["-s", "1", "-t", "0.7", "-d", "0.2", "-e", "0.2"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("must not exceed 1"));
    for split in SPLITS {
        assert!(!fixture.output("", split).exists());
    }
}

#[test]
fn test_seed_is_required() {
    let fixture = TestFixture::new();
    let input = fixture.create_numbered_corpus("corpus.tag", 10);

    let output = fixture.run(&input, "", &[]);
    assert!(!output.status.success());
}

#[test]
fn test_missing_input_fails() {
    let fixture = TestFixture::new();
    let missing = fixture.root_path.join("missing.tag");

    let output = fixture.run(&missing, "", &["-s", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.tag"));
}

#[test]
fn test_stats_output_json() {
    let fixture = TestFixture::new();
    let input = fixture.create_numbered_corpus("corpus.tag", 3);
    let stats_file = fixture.root_path.join("stats.json");

    let output = fixture.run(
        &input,
        "",
        &["-s", "42", "--stats-out", stats_file.to_str().unwrap()],
    );
    assert!(output.status.success());

    let stats: Value =
        serde_json::from_str(&fs::read_to_string(&stats_file).expect("Failed to read stats file"))
            .expect("Failed to parse JSON");
    assert_eq!(stats["strategy"], "streaming");
    assert_eq!(stats["seed"], 42);
    assert_eq!(stats["total_sentences"], 3);
    assert_eq!(stats["train"]["quota"], 2);
    assert_eq!(stats["train"]["written"], 2);
    assert_eq!(stats["dev"]["written"], 0);
    assert_eq!(stats["dropped"], 1);
}
