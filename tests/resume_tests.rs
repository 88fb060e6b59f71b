//! Integration tests for auto-save and resume across simulated process
//! restarts.
//!
//! A "restart" is modeled by dropping every store handle and opening a new
//! `FileProgressStore` over the same data directory.

use mindstone::content::Catalog;
use mindstone::extended::{ExtendedTest, PageAdvance, PageView, DEFAULT_PAGE_SIZE};
use mindstone::persistence::{FileProgressStore, ProgressStore};
use tempfile::TempDir;

const IDENTITY: &str = "minji@example.com";

fn new_test(data_dir: &TempDir) -> ExtendedTest<FileProgressStore> {
    let catalog = Catalog::builtin().unwrap();
    let mut test = ExtendedTest::new(catalog.extended().to_vec(), DEFAULT_PAGE_SIZE);
    let store = FileProgressStore::new(data_dir.path()).unwrap();
    test.resume(IDENTITY, store);
    test
}

#[test]
fn test_answers_and_page_survive_restart() {
    let data_dir = TempDir::new().unwrap();

    {
        let mut test = new_test(&data_dir);
        test.record_choice(1, "오늘 해야 할 일과 일정").unwrap();
        test.record_text(4, "끝나지 않는 회의").unwrap();
        test.next_page().unwrap();
        test.record_choice(11, "안개와 바람. 뚜렷하지 않은 불안")
            .unwrap();
    }

    let resumed = new_test(&data_dir);
    assert_eq!(resumed.page(), 1);
    assert_eq!(resumed.saved_answer(1), Some("오늘 해야 할 일과 일정"));
    assert_eq!(resumed.saved_answer(4), Some("끝나지 않는 회의"));
    assert_eq!(
        resumed.saved_answer(11),
        Some("안개와 바람. 뚜렷하지 않은 불안")
    );
    assert_eq!(resumed.saved_answer(2), None);
}

#[test]
fn test_changed_answer_is_the_one_that_survives() {
    let data_dir = TempDir::new().unwrap();

    {
        let mut test = new_test(&data_dir);
        test.record_choice(2, "이른 아침").unwrap();
        test.record_choice(2, "모두가 잠든 늦은 밤").unwrap();
    }

    let resumed = new_test(&data_dir);
    assert_eq!(resumed.saved_answer(2), Some("모두가 잠든 늦은 밤"));
}

#[test]
fn test_backwards_navigation_is_persisted() {
    let data_dir = TempDir::new().unwrap();

    {
        let mut test = new_test(&data_dir);
        test.next_page().unwrap();
        test.next_page().unwrap();
        test.prev_page().unwrap();
    }

    let resumed = new_test(&data_dir);
    assert_eq!(resumed.page(), 1);
}

#[test]
fn test_corrupt_record_degrades_to_fresh_progress() {
    let data_dir = TempDir::new().unwrap();

    {
        let mut test = new_test(&data_dir);
        test.record_text(4, "곧 망가질 기록").unwrap();
    }

    // Corrupt the stored record on disk.
    let path = data_dir
        .path()
        .join("progress")
        .join(format!("{}.json", hex::encode(IDENTITY)));
    std::fs::write(&path, "{ not json }").unwrap();

    let resumed = new_test(&data_dir);
    assert_eq!(resumed.page(), 0);
    assert!(resumed.answers().is_empty());
}

#[test]
fn test_identities_do_not_share_progress() {
    let data_dir = TempDir::new().unwrap();
    let catalog = Catalog::builtin().unwrap();

    {
        let mut test = new_test(&data_dir);
        test.record_text(4, "민지의 답").unwrap();
    }

    let mut other = ExtendedTest::new(catalog.extended().to_vec(), DEFAULT_PAGE_SIZE);
    other.resume(
        "other@example.com",
        FileProgressStore::new(data_dir.path()).unwrap(),
    );
    assert_eq!(other.saved_answer(4), None);
}

#[test]
fn test_completed_run_reaches_submission_and_clears_record() {
    let data_dir = TempDir::new().unwrap();
    let mut test = new_test(&data_dir);
    test.record_choice(1, "오늘 해야 할 일과 일정").unwrap();

    let mut completions = 0;
    while test.current_page() != PageView::ReadyToSubmit {
        if test.next_page().unwrap() == PageAdvance::Completed {
            completions += 1;
        }
    }
    assert_eq!(completions, 1);

    let submission = test.submission();
    assert_eq!(submission.identity.as_deref(), Some(IDENTITY));
    assert_eq!(submission.answers.len(), 50);
    assert_eq!(submission.answered_count(), 1);

    test.clear_saved().unwrap();
    let store = FileProgressStore::new(data_dir.path()).unwrap();
    assert!(store.load(IDENTITY).unwrap().is_none());
}
