//! Selecting tweets from an export on disk

use histweet_core::{load_archive, select_from_archive, ArchiveError, Error};
use std::io::Write;
use tempfile::NamedTempFile;

fn tweet(id: u64, created_at: &str, text: &str, likes: u64, retweets: u64) -> String {
    format!(
        r#"{{ "tweet": {{ "id": "{}", "id_str": "{}", "created_at": "{}", "full_text": "{}", "favorite_count": "{}", "retweet_count": "{}" }} }}"#,
        id, id, created_at, text, likes, retweets
    )
}

fn write_archive(entries: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "window.YTD.tweet.part0 = [\n{}\n]", entries.join(",\n")).unwrap();
    file
}

fn sample_archive() -> NamedTempFile {
    write_archive(&[
        tweet(100, "Sat May 09 10:00:00 +0000 2020", "lunch photo", 1, 0),
        tweet(200, "Mon May 11 10:00:00 +0000 2020", "launch day!", 250, 40),
        tweet(300, "Tue Jan 05 08:15:00 +0000 2021", "RT @news: big story", 0, 3),
        tweet(400, "Thu Jan 07 23:59:59 +0000 2021", "@pal agreed", 4, 0),
    ])
}

#[test]
fn test_load_archive() {
    let file = sample_archive();
    let posts = load_archive(file.path()).unwrap();

    assert_eq!(posts.len(), 4);
    assert_eq!(posts[1].id, 200);
    assert_eq!(posts[1].num_likes, 250);
    assert_eq!(posts[1].num_retweets, 40);
    assert!(posts[2].is_retweet);
    assert!(posts[3].is_reply);
}

#[test]
fn test_select_from_archive() {
    let file = sample_archive();

    let ids = select_from_archive("created < 10-May-2020 || likes < 5", file.path(), false).unwrap();
    assert_eq!(ids, vec![100, 300, 400]);

    let ids = select_from_archive("created < 10-May-2020 || likes < 5", file.path(), true).unwrap();
    assert_eq!(ids, vec![200]);

    let ids = select_from_archive(r#"text ~ "^(RT|@)" && created > 01-Jan-2021"#, file.path(), false)
        .unwrap();
    assert_eq!(ids, vec![300, 400]);
}

#[test]
fn test_select_reports_rule_errors_first() {
    let err = select_from_archive("likes >", "/nonexistent/tweet.js", false).unwrap_err();
    assert!(matches!(err, Error::ParseError(_)));
}

#[test]
fn test_missing_archive() {
    let err = select_from_archive("likes > 1", "/nonexistent/tweet.js", false).unwrap_err();
    assert!(matches!(err, Error::ArchiveError(ArchiveError::Io(_))));
}

#[test]
fn test_malformed_archive() {
    let file = write_archive(&[tweet(1, "yesterday", "oops", 0, 0)]);
    let err = load_archive(file.path()).unwrap_err();
    assert!(matches!(err, ArchiveError::InvalidField { field: "created_at", .. }));
}
