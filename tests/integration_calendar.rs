mod common;

use chrono::{Duration, Utc};
use common::{calendar_file, file_calendar, TestEvent};
use meetingalarm::{AppError, Calendar, CalendarSource, Lookahead, UrlOpener};
use mockall::mock;

mock! {
    pub Opener {}
    impl UrlOpener for Opener {
        fn open_url(&self, url: &str) -> meetingalarm::AppResult<()>;
    }
}

#[tokio::test]
async fn test_very_soon_excludes_all_day() {
    let file = calendar_file(&[
        TestEvent::new("a", "Standup", Duration::minutes(5)),
        TestEvent {
            all_day: true,
            ..TestEvent::new("b", "Offsite", Duration::minutes(5))
        },
    ]);
    let calendar = file_calendar(&file, None);

    let events = calendar.get_upcoming_events(Lookahead::VerySoon).await.unwrap();
    let uids: Vec<&str> = events.iter().map(|e| e.uid.as_str()).collect();
    assert_eq!(uids, vec!["a"]);
}

#[tokio::test]
async fn test_upcoming_invariants() {
    let file = calendar_file(&[
        TestEvent::new("later", "Planning", Duration::hours(4)),
        TestEvent::new("past", "Breakfast", Duration::hours(-3)),
        TestEvent::new("next", "Standup", Duration::minutes(20)),
        TestEvent::new("tomorrow", "Review", Duration::hours(20)),
        TestEvent {
            all_day: true,
            ..TestEvent::new("holiday", "Holiday", Duration::hours(1))
        },
    ]);
    let calendar = file_calendar(&file, None);
    let now = Utc::now();

    let events = calendar.get_upcoming_events(Lookahead::Soon).await.unwrap();
    let uids: Vec<&str> = events.iter().map(|e| e.uid.as_str()).collect();
    assert_eq!(uids, vec!["next", "later"]);
    assert!(events.iter().all(|e| !e.all_day && !e.ended(now)));
    assert!(events.windows(2).all(|pair| pair[0].start <= pair[1].start));
}

#[tokio::test]
async fn test_daily_meeting_started_last_week_shows_today() {
    let file = calendar_file(&[TestEvent {
        rrule: Some("FREQ=DAILY"),
        ..TestEvent::new("daily", "Standup", Duration::days(-7) + Duration::minutes(30))
    }]);
    let calendar = file_calendar(&file, None);
    let now = Utc::now();

    let events = calendar.get_upcoming_events(Lookahead::Soon).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].uid, "daily");
    assert!(events[0].start > now);
    assert!(events[0].start - now <= Duration::minutes(30));
    assert_eq!(events[0].end - events[0].start, Duration::minutes(30));

    let very_soon = calendar.get_upcoming_events(Lookahead::VerySoon).await.unwrap();
    assert!(very_soon.is_empty());
}

#[tokio::test]
async fn test_ignored_event_stays_hidden() {
    let file = calendar_file(&[
        TestEvent::new("a", "Standup", Duration::minutes(5)),
        TestEvent::new("b", "1:1", Duration::minutes(8)),
    ]);
    let mut calendar = file_calendar(&file, None);

    calendar.ignore_event("a");
    let once = calendar.get_upcoming_events(Lookahead::VerySoon).await.unwrap();

    calendar.ignore_event("a");
    let twice = calendar.get_upcoming_events(Lookahead::VerySoon).await.unwrap();

    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);
    assert_eq!(once[0].uid, "b");

    // Still present in the raw source.
    assert!(calendar.get_event_by_uid("a").await.unwrap().is_some());
}

#[tokio::test]
async fn test_empty_calendar_yields_nothing() {
    let file = calendar_file(&[]);
    let calendar = file_calendar(&file, None);

    assert!(calendar.get_upcoming_events(Lookahead::Soon).await.unwrap().is_empty());
    assert!(calendar.get_event_by_uid("anything").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_event_by_uid() {
    let file = calendar_file(&[
        TestEvent::new("a", "Standup", Duration::minutes(5)),
        TestEvent::new("old", "Yesterday", Duration::hours(-26)),
    ]);
    let calendar = file_calendar(&file, None);

    let found = calendar.get_event_by_uid("old").await.unwrap();
    assert_eq!(found.map(|e| e.summary), Some("Yesterday".to_string()));
    assert!(calendar.get_event_by_uid("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_fetch_error_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let calendar = Calendar::new(CalendarSource::File(dir.path().join("gone.ics")), None).unwrap();

    let result = calendar.get_upcoming_events(Lookahead::Soon).await;
    assert!(matches!(result, Err(AppError::Io(_))));
}

#[tokio::test]
async fn test_open_event_uses_location_link() {
    let file = calendar_file(&[TestEvent {
        location: Some("see http://example.com/x for info"),
        ..TestEvent::new("a", "Standup", Duration::minutes(5))
    }]);
    let calendar = file_calendar(&file, Some("http://fallback"));

    let mut opener = MockOpener::new();
    opener
        .expect_open_url()
        .withf(|url| url == "http://example.com/x")
        .times(1)
        .returning(|_| Ok(()));

    calendar.open_event("a", &opener).await.unwrap();
}

#[tokio::test]
async fn test_open_event_falls_back_to_default_url() {
    let file = calendar_file(&[TestEvent {
        location: Some("Room 4"),
        description: Some("Quarterly numbers"),
        ..TestEvent::new("a", "Review", Duration::minutes(5))
    }]);
    let calendar = file_calendar(&file, Some("http://fallback"));

    let mut opener = MockOpener::new();
    opener
        .expect_open_url()
        .withf(|url| url == "http://fallback")
        .times(1)
        .returning(|_| Ok(()));

    calendar.open_event("a", &opener).await.unwrap();
}

#[tokio::test]
async fn test_open_event_without_any_target_is_noop() {
    let file = calendar_file(&[TestEvent::new("a", "Review", Duration::minutes(5))]);
    let calendar = file_calendar(&file, None);

    let mut opener = MockOpener::new();
    opener.expect_open_url().never();

    calendar.open_event("a", &opener).await.unwrap();
    calendar.open_event("unknown", &opener).await.unwrap();
}
