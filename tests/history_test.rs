use activity_qa::history::{HISTORY_LIMIT, HistoryStore, db_path};
use serial_test::serial;
use std::thread;
use tempfile::TempDir;

#[test]
#[serial]
fn test_db_path_env_override() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.db");
    unsafe { std::env::set_var("ACTIVITY_QA_DB_PATH", path.to_str().unwrap()) };

    assert_eq!(db_path().unwrap(), path);
    let store = HistoryStore::open_default().unwrap();
    store.push("What was executed?").unwrap();
    assert!(path.exists());

    unsafe { std::env::remove_var("ACTIVITY_QA_DB_PATH") };
}

#[test]
#[serial]
fn test_history_keeps_last_ten_newest_first() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("history.db");

    let store = HistoryStore::open(&path).unwrap();
    for i in 0..15 {
        store.push(&format!("question {i}")).unwrap();
    }
    // re-asking moves a question to the front
    store.push("question 7").unwrap();

    let reopened = HistoryStore::open(&path).unwrap();
    let recent = reopened.recent().unwrap();
    assert_eq!(recent.len(), HISTORY_LIMIT);
    assert_eq!(recent[0], "question 7");
    assert_eq!(recent[1], "question 14");
    assert_eq!(recent.iter().filter(|q| *q == "question 7").count(), 1);
    assert!(!recent.contains(&"question 4".to_string()));
}

/// Several processes may share one history file
#[test]
#[serial]
fn test_concurrent_history_writers() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("shared.db");
    HistoryStore::open(&path).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let path = path.clone();
            thread::spawn(move || {
                let store = HistoryStore::open(&path).unwrap();
                for j in 0..5 {
                    let mut attempts = 0;
                    loop {
                        match store.push(&format!("t{i}-q{j}")) {
                            Ok(()) => break,
                            Err(e) if e.to_string().contains("locked") && attempts < 5 => {
                                attempts += 1;
                                thread::sleep(std::time::Duration::from_millis(50 * attempts));
                            }
                            Err(e) => panic!("thread {i} push {j} failed: {e:?}"),
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let recent = HistoryStore::open(&path).unwrap().recent().unwrap();
    assert!(!recent.is_empty());
    assert!(recent.len() <= HISTORY_LIMIT);
}
