use super::*;
use async_trait::async_trait;
use quizcast_core::question::parse;
use quizcast_memory::{FileCursor, MemoryCursor};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Sent {
    Quiz {
        destination: String,
        prompt: String,
        correct_index: Option<usize>,
    },
    Notice {
        destination: String,
        text: String,
    },
}

/// Records every call; fails for destinations listed in `failing`.
#[derive(Default)]
struct RecordingDelivery {
    sent: Mutex<Vec<Sent>>,
    failing: Vec<String>,
}

impl RecordingDelivery {
    fn failing(destinations: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: destinations.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn quiz_prompts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Quiz { prompt, .. } => Some(prompt),
                Sent::Notice { .. } => None,
            })
            .collect()
    }

    fn check(&self, destination: &str) -> Result<(), QuizError> {
        if self.failing.iter().any(|d| d == destination) {
            Err(QuizError::Channel(format!("refused {destination}")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send_quiz(
        &self,
        destination: &str,
        prompt: &str,
        _options: &[String],
        correct_index: Option<usize>,
    ) -> Result<(), QuizError> {
        self.sent.lock().unwrap().push(Sent::Quiz {
            destination: destination.to_string(),
            prompt: prompt.to_string(),
            correct_index,
        });
        self.check(destination)
    }

    async fn send_notice(&self, destination: &str, text: &str) -> Result<(), QuizError> {
        self.sent.lock().unwrap().push(Sent::Notice {
            destination: destination.to_string(),
            text: text.to_string(),
        });
        self.check(destination)
    }
}

fn bank(n: usize) -> Vec<QuestionRecord> {
    let raw = (1..=n)
        .map(|i| format!("{i}. Question {i}?\na) w\nb) x\nc) y\nd) z\nAnswer: b"))
        .collect::<Vec<_>>()
        .join("\n\n");
    parse(&raw)
}

fn settings(destinations: &[&str], batch_size: usize) -> DriverSettings {
    DriverSettings {
        destinations: destinations.iter().map(|d| d.to_string()).collect(),
        batch_size,
        advance_on_partial_failure: true,
        exhausted_message: "All questions have been sent. We are done!".into(),
    }
}

#[tokio::test]
async fn test_end_to_end_three_runs() {
    let store = Arc::new(MemoryCursor::default());
    let delivery = Arc::new(RecordingDelivery::default());
    let driver = Driver::new(bank(25), store.clone(), delivery.clone(), settings(&["42"], 20));

    let first = driver.run_once().await.unwrap();
    assert_eq!(
        first,
        RunOutcome::Sent {
            start: 0,
            end: 20,
            delivered: 20,
            failed: 0,
            advanced: true
        }
    );
    assert_eq!(store.load().await, 20);
    let prompts = delivery.quiz_prompts();
    assert_eq!(prompts.len(), 20);
    assert_eq!(prompts[0], "1. Question 1?");
    assert_eq!(prompts[19], "20. Question 20?");

    let second = driver.run_once().await.unwrap();
    assert_eq!(
        second,
        RunOutcome::Sent {
            start: 20,
            end: 25,
            delivered: 5,
            failed: 0,
            advanced: true
        }
    );
    assert_eq!(store.load().await, 25);
    let prompts = delivery.quiz_prompts();
    assert_eq!(prompts.len(), 25);
    assert_eq!(prompts[20], "21. Question 21?");
    assert_eq!(prompts[24], "25. Question 25?");

    let third = driver.run_once().await.unwrap();
    assert_eq!(
        third,
        RunOutcome::Exhausted {
            notified: 1,
            failed: 0
        }
    );
    assert_eq!(store.load().await, 25);
    assert_eq!(store.save_count(), 2, "exhausted run must not save");
    assert_eq!(
        delivery.sent().last(),
        Some(&Sent::Notice {
            destination: "42".into(),
            text: "All questions have been sent. We are done!".into(),
        })
    );
}

#[tokio::test]
async fn test_exhausted_is_idempotent() {
    let store = Arc::new(MemoryCursor::new(3));
    let delivery = Arc::new(RecordingDelivery::default());
    let driver = Driver::new(bank(3), store.clone(), delivery.clone(), settings(&["1", "2"], 20));

    for _ in 0..2 {
        let outcome = driver.run_once().await.unwrap();
        assert_eq!(
            outcome,
            RunOutcome::Exhausted {
                notified: 2,
                failed: 0
            }
        );
        assert_eq!(store.load().await, 3);
    }
    assert_eq!(store.save_count(), 0);
    assert!(delivery.quiz_prompts().is_empty());
}

#[tokio::test]
async fn test_cursor_past_end_not_regressed() {
    let store = Arc::new(MemoryCursor::new(40));
    let delivery = Arc::new(RecordingDelivery::default());
    let driver = Driver::new(bank(25), store.clone(), delivery, settings(&["1"], 20));

    driver.run_once().await.unwrap();
    assert_eq!(store.load().await, 40);
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_each_question_goes_to_every_destination_in_order() {
    let store = Arc::new(MemoryCursor::default());
    let delivery = Arc::new(RecordingDelivery::default());
    let driver = Driver::new(bank(2), store, delivery.clone(), settings(&["a", "b"], 20));

    driver.run_once().await.unwrap();
    let order: Vec<(String, String)> = delivery
        .sent()
        .into_iter()
        .filter_map(|s| match s {
            Sent::Quiz {
                destination,
                prompt,
                ..
            } => Some((prompt, destination)),
            Sent::Notice { .. } => None,
        })
        .collect();
    assert_eq!(
        order,
        vec![
            ("1. Question 1?".to_string(), "a".to_string()),
            ("1. Question 1?".to_string(), "b".to_string()),
            ("2. Question 2?".to_string(), "a".to_string()),
            ("2. Question 2?".to_string(), "b".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_failures_do_not_abort_and_cursor_still_advances() {
    let store = Arc::new(MemoryCursor::default());
    let delivery = Arc::new(RecordingDelivery::failing(&["bad"]));
    let driver = Driver::new(
        bank(5),
        store.clone(),
        delivery.clone(),
        settings(&["bad", "good"], 3),
    );

    let outcome = driver.run_once().await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Sent {
            start: 0,
            end: 3,
            delivered: 3,
            failed: 3,
            advanced: true
        }
    );
    assert_eq!(delivery.sent().len(), 6);
    assert_eq!(store.load().await, 3);
}

#[tokio::test]
async fn test_all_failures_still_advance_by_default() {
    let store = Arc::new(MemoryCursor::default());
    let delivery = Arc::new(RecordingDelivery::failing(&["x"]));
    let driver = Driver::new(bank(4), store.clone(), delivery, settings(&["x"], 2));

    let outcome = driver.run_once().await.unwrap();
    assert!(matches!(
        outcome,
        RunOutcome::Sent {
            delivered: 0,
            failed: 2,
            advanced: true,
            ..
        }
    ));
    assert_eq!(store.load().await, 2);
}

#[tokio::test]
async fn test_hold_cursor_on_failure_when_configured() {
    let store = Arc::new(MemoryCursor::new(1));
    let delivery = Arc::new(RecordingDelivery::failing(&["bad"]));
    let mut s = settings(&["good", "bad"], 2);
    s.advance_on_partial_failure = false;
    let driver = Driver::new(bank(5), store.clone(), delivery, s);

    let outcome = driver.run_once().await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Sent {
            start: 1,
            end: 3,
            delivered: 2,
            failed: 2,
            advanced: false
        }
    );
    assert_eq!(store.load().await, 1);
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_hold_flag_still_advances_on_clean_batch() {
    let store = Arc::new(MemoryCursor::default());
    let delivery = Arc::new(RecordingDelivery::default());
    let mut s = settings(&["good"], 2);
    s.advance_on_partial_failure = false;
    let driver = Driver::new(bank(5), store.clone(), delivery, s);

    driver.run_once().await.unwrap();
    assert_eq!(store.load().await, 2);
}

#[tokio::test]
async fn test_exhausted_notice_failures_counted() {
    let store = Arc::new(MemoryCursor::new(1));
    let delivery = Arc::new(RecordingDelivery::failing(&["b"]));
    let driver = Driver::new(bank(1), store, delivery, settings(&["a", "b", "c"], 20));

    let outcome = driver.run_once().await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Exhausted {
            notified: 2,
            failed: 1
        }
    );
}

#[tokio::test]
async fn test_no_destinations_is_config_error() {
    let store = Arc::new(MemoryCursor::default());
    let delivery = Arc::new(RecordingDelivery::default());
    let driver = Driver::new(bank(3), store.clone(), delivery, settings(&[], 20));

    assert!(matches!(driver.run_once().await, Err(QuizError::Config(_))));
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_unscored_question_passed_through() {
    let raw = "Q?\na) w\nb) x\nc) y\nd) z\nAnswer: q";
    let store = Arc::new(MemoryCursor::default());
    let delivery = Arc::new(RecordingDelivery::default());
    let driver = Driver::new(parse(raw), store, delivery.clone(), settings(&["1"], 20));

    driver.run_once().await.unwrap();
    assert_eq!(
        delivery.sent(),
        vec![Sent::Quiz {
            destination: "1".into(),
            prompt: "Q?".into(),
            correct_index: None,
        }]
    );
}

#[tokio::test]
async fn test_reset_clamps_to_bank_size() {
    let store = Arc::new(MemoryCursor::new(10));
    let delivery = Arc::new(RecordingDelivery::default());
    let driver = Driver::new(bank(5), store.clone(), delivery, settings(&["1"], 20));

    assert_eq!(driver.reset(99).await.unwrap(), 5);
    assert_eq!(store.load().await, 5);
    assert_eq!(driver.reset(0).await.unwrap(), 0);
    let progress = driver.progress().await;
    assert_eq!(progress, Progress { cursor: 0, total: 5 });
    assert_eq!(progress.remaining(), 5);
}

#[tokio::test]
async fn test_resumes_from_file_cursor_across_drivers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.txt");

    for expected_end in [20, 25] {
        let store = Arc::new(FileCursor::new(&path));
        let delivery = Arc::new(RecordingDelivery::default());
        let driver = Driver::new(bank(25), store, delivery, settings(&["42"], 20));
        let outcome = driver.run_once().await.unwrap();
        assert!(matches!(outcome, RunOutcome::Sent { end, .. } if end == expected_end));
    }
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "25");

    let store = Arc::new(FileCursor::new(&path));
    let delivery = Arc::new(RecordingDelivery::default());
    let driver = Driver::new(bank(25), store, delivery, settings(&["42"], 20));
    assert!(matches!(
        driver.run_once().await.unwrap(),
        RunOutcome::Exhausted { notified: 1, .. }
    ));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "25");
}

#[tokio::test]
async fn test_corrupt_cursor_starts_over() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.txt");
    std::fs::write(&path, "not a number").unwrap();

    let delivery = Arc::new(RecordingDelivery::default());
    let driver = Driver::new(
        bank(3),
        Arc::new(FileCursor::new(&path)),
        delivery.clone(),
        settings(&["42"], 20),
    );
    let outcome = driver.run_once().await.unwrap();
    assert!(matches!(outcome, RunOutcome::Sent { start: 0, end: 3, .. }));
    assert_eq!(delivery.quiz_prompts()[0], "1. Question 1?");
}

#[test]
fn test_settings_from_config() {
    let mut cfg = Config::default();
    cfg.telegram.chat_ids = vec!["1".into(), " 1 ".into(), "".into(), "2".into()];
    cfg.quiz.batch_size = 7;
    let s = DriverSettings::from_config(&cfg);
    assert_eq!(s.destinations, vec!["1", "2"]);
    assert_eq!(s.batch_size, 7);
    assert!(s.advance_on_partial_failure);
}
