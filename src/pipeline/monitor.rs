// src/pipeline/monitor.rs

//! Poll loop.
//!
//! Alternates between polling every watched course in turn and sleeping
//! for the configured interval. State is persisted once per cycle, after
//! every course has been processed.

use std::time::Duration;

use chrono::Local;

use crate::models::{StateMap, WatchedCourse};
use crate::notify::NotificationDispatcher;
use crate::pipeline::diff::apply_sections;
use crate::services::{SectionParser, SectionSource};
use crate::storage::StateStore;
use crate::utils::log::Logger;

/// Summary of one polling cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Courses whose page was fetched and parsed
    pub courses_checked: usize,
    /// Courses skipped because the fetch failed or returned no sections
    pub courses_skipped: usize,
    /// Titles of alerts dispatched this cycle
    pub alerts: Vec<String>,
    /// Codes of sections that filled up this cycle
    pub filled: Vec<String>,
    /// Whether the state snapshot was written
    pub saved: bool,
}

/// Seat monitor driving fetch, parse, diff, notify and persist.
pub struct Monitor {
    courses: Vec<WatchedCourse>,
    interval: Duration,
    source: Box<dyn SectionSource>,
    parser: SectionParser,
    store: Box<dyn StateStore>,
    notifier: NotificationDispatcher,
    logger: Logger,
    state: StateMap,
}

impl Monitor {
    pub fn new(
        courses: Vec<WatchedCourse>,
        interval: Duration,
        source: Box<dyn SectionSource>,
        parser: SectionParser,
        store: Box<dyn StateStore>,
        notifier: NotificationDispatcher,
        logger: Logger,
    ) -> Self {
        Self {
            courses,
            interval,
            source,
            parser,
            store,
            notifier,
            logger,
            state: StateMap::new(),
        }
    }

    /// In-memory state as of the last cycle.
    pub fn state(&self) -> &StateMap {
        &self.state
    }

    /// Replace in-memory state with the persisted snapshot.
    pub async fn load_state(&mut self) {
        self.state = self.store.load().await;
        self.logger.info(&format!(
            "  Loaded state for {} section(s)",
            self.state.len()
        ));
    }

    /// Poll forever. Only process shutdown stops this loop.
    pub async fn run(mut self) {
        self.logger.header("Seat Monitor - started");
        self.logger.info(&format!(
            "  Watching {} course(s), checking every {}s",
            self.courses.len(),
            self.interval.as_secs()
        ));
        self.logger.info(&format!(
            "  Notifications via: {}",
            self.notifier.backend_name()
        ));

        self.load_state().await;

        loop {
            self.run_cycle().await;
            self.logger.info(&format!(
                "  Next check in {}s ...",
                self.interval.as_secs()
            ));
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run one polling cycle over every course, then persist state once.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.logger.separator();
        self.logger.info(&format!(
            "  Checking at {} ...",
            Local::now().format("%I:%M:%S %p")
        ));

        let mut report = CycleReport::default();
        let courses = std::mem::take(&mut self.courses);

        for course in &courses {
            if self.check_course(course, &mut report).await {
                report.courses_checked += 1;
            } else {
                report.courses_skipped += 1;
            }
        }

        self.courses = courses;

        match self.store.save(&self.state).await {
            Ok(()) => report.saved = true,
            Err(e) => self.logger.error(&format!("  [FAIL] saving state: {e}")),
        }

        report
    }

    /// Process one course; returns false when it was skipped.
    async fn check_course(&mut self, course: &WatchedCourse, report: &mut CycleReport) -> bool {
        let html = match self.source.fetch_page(course).await {
            Ok(html) => html,
            Err(e) => {
                self.logger
                    .error(&format!("  [FAIL] {}: {}", course.label, e));
                return false;
            }
        };

        let sections = self.parser.parse(&html);
        if sections.is_empty() {
            self.logger
                .warn(&format!("  [WARN] No sections found for {}", course.label));
            return false;
        }

        let outcome = apply_sections(course, &sections, &mut self.state);

        for observation in &outcome.observed {
            self.logger.info(&format!("  {}", observation.status_line()));
        }

        for alert in &outcome.alerts {
            let title = alert.title();
            self.logger.info(&format!("  [ALERT] {title}"));
            self.notifier
                .notify(&title, &alert.body(Local::now()), alert.urgent)
                .await;
            report.alerts.push(title);
        }

        for code in &outcome.filled {
            self.logger.info(&format!("  [INFO] {code} filled up again."));
        }
        report.filled.extend(outcome.filled);

        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::error::{AppError, Result};
    use crate::models::SectionFilter;
    use crate::notify::testing::RecordingNotifier;
    use crate::storage::JsonStateStore;

    /// Serves scripted pages keyed by `course_sec`; unknown courses fail.
    #[derive(Clone, Default)]
    struct ScriptedSource {
        pages: Arc<Mutex<HashMap<String, String>>>,
    }

    impl ScriptedSource {
        fn set(&self, course_sec: &str, html: String) {
            self.pages
                .lock()
                .unwrap()
                .insert(course_sec.to_string(), html);
        }

        fn remove(&self, course_sec: &str) {
            self.pages.lock().unwrap().remove(course_sec);
        }
    }

    #[async_trait]
    impl SectionSource for ScriptedSource {
        async fn fetch_page(&self, course: &WatchedCourse) -> Result<String> {
            self.pages
                .lock()
                .unwrap()
                .get(&course.course_sec)
                .cloned()
                .ok_or_else(|| AppError::fetch(&course.label, "503 Service Unavailable"))
        }
    }

    fn page(rows: &[(&str, u32)]) -> String {
        let rows: String = rows
            .iter()
            .map(|(code, available)| {
                format!(
                    "<tr><td class=\"course\"><a class=\"coursenum\">{code}</a>\
                     <span class=\"coursetype\">LAB</span></td>\
                     <td>Fundamentals of Physics Lab II</td>\
                     <td class=\"openseats\">{available} OF 24</td>\
                     <td class=\"campus\">Newark</td><td class=\"day\">TR</td>\
                     <td class=\"time\">2:00PM - 4:00PM</td></tr>"
                )
            })
            .collect();
        format!("<html><body><table>{rows}</table></body></html>")
    }

    fn watched(course_sec: &str, sections: &[&str], priority: &[&str]) -> WatchedCourse {
        WatchedCourse {
            label: course_sec.to_uppercase(),
            course_sec: course_sec.to_string(),
            term: "2263".to_string(),
            sections: SectionFilter::Only(sections.iter().map(|s| s.to_string()).collect()),
            priority: priority.iter().map(|s| s.to_string()).collect(),
        }
    }

    struct Harness {
        _tmp: TempDir,
        source: ScriptedSource,
        notifier: RecordingNotifier,
        logger: Logger,
        store: JsonStateStore,
        monitor: Monitor,
    }

    fn harness(courses: Vec<WatchedCourse>, notifier: RecordingNotifier) -> Harness {
        let tmp = TempDir::new().unwrap();
        let logger = Logger::memory();
        let source = ScriptedSource::default();
        let store = JsonStateStore::new(tmp.path().join("state.json"), logger.clone());

        let monitor = Monitor::new(
            courses,
            Duration::from_secs(180),
            Box::new(source.clone()),
            SectionParser::new().unwrap(),
            Box::new(store.clone()),
            NotificationDispatcher::new(Box::new(notifier.clone()), logger.clone()),
            logger.clone(),
        );

        Harness {
            _tmp: tmp,
            source,
            notifier,
            logger,
            store,
            monitor,
        }
    }

    #[tokio::test]
    async fn test_priority_seat_opens_across_cycles() {
        let mut h = harness(
            vec![watched("phys228", &["042"], &["042"])],
            RecordingNotifier::default(),
        );

        h.source.set("phys228", page(&[("PHYS22804042", 0)]));
        let first = h.monitor.run_cycle().await;
        assert!(first.alerts.is_empty());
        assert!(first.saved);
        assert_eq!(h.store.load().await["2263_PHYS22804042"].available, 0);

        h.source.set("phys228", page(&[("PHYS22804042", 2)]));
        let second = h.monitor.run_cycle().await;

        let sent = h.notifier.messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].urgent);
        assert!(sent[0].title.contains("PRIORITY"));
        assert!(sent[0].title.contains("042"));
        assert!(sent[0].body.contains("Seats: 2 of 24 now open"));
        assert_eq!(second.alerts, vec![sent[0].title.clone()]);
        assert_eq!(h.store.load().await["2263_PHYS22804042"].available, 2);
    }

    #[tokio::test]
    async fn test_repeat_cycle_sends_nothing_new() {
        let mut h = harness(
            vec![watched("phys228", &["042"], &[])],
            RecordingNotifier::default(),
        );

        h.source.set("phys228", page(&[("PHYS22804042", 0)]));
        h.monitor.run_cycle().await;
        h.source.set("phys228", page(&[("PHYS22804042", 3)]));
        h.monitor.run_cycle().await;
        h.monitor.run_cycle().await;

        let sent = h.notifier.messages();
        assert_eq!(sent.len(), 1);
        assert!(!sent[0].urgent);
        assert_eq!(sent[0].title, "Seat opened - PHYS22804042");
    }

    #[tokio::test]
    async fn test_fill_is_logged_not_notified() {
        let mut h = harness(
            vec![watched("phys228", &["042"], &[])],
            RecordingNotifier::default(),
        );

        h.source.set("phys228", page(&[("PHYS22804042", 3)]));
        h.monitor.run_cycle().await;
        h.source.set("phys228", page(&[("PHYS22804042", 0)]));
        let report = h.monitor.run_cycle().await;

        assert!(h.notifier.messages().is_empty());
        assert_eq!(report.filled, vec!["PHYS22804042"]);
        assert!(
            h.logger
                .captured()
                .iter()
                .any(|line| line.contains("PHYS22804042 filled up again."))
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_course_only() {
        let mut h = harness(
            vec![
                watched("phys228", &["042"], &[]),
                watched("engl410", &["012"], &[]),
            ],
            RecordingNotifier::default(),
        );

        h.source.set("phys228", page(&[("PHYS22804042", 0)]));
        h.source.set("engl410", page(&[("ENGL410012", 0)]));
        h.monitor.run_cycle().await;

        h.source.remove("phys228");
        h.source.set("engl410", page(&[("ENGL410012", 1)]));
        let report = h.monitor.run_cycle().await;

        assert_eq!(report.courses_checked, 1);
        assert_eq!(report.courses_skipped, 1);
        assert_eq!(report.alerts, vec!["Seat opened - ENGL410012"]);
        assert_eq!(h.monitor.state()["2263_PHYS22804042"].available, 0);
        assert!(
            h.logger
                .captured()
                .iter()
                .any(|line| line.contains("[FAIL] PHYS228"))
        );
    }

    #[tokio::test]
    async fn test_empty_page_skips_course() {
        let mut h = harness(
            vec![watched("phys228", &["042"], &[])],
            RecordingNotifier::default(),
        );

        h.source.set("phys228", "<html><body>No results</body></html>".to_string());
        let report = h.monitor.run_cycle().await;

        assert_eq!(report.courses_skipped, 1);
        assert!(h.monitor.state().is_empty());
        assert!(report.saved);
    }

    #[tokio::test]
    async fn test_failed_notification_does_not_abort_cycle() {
        let mut h = harness(
            vec![watched("phys228", &["040", "042"], &[])],
            RecordingNotifier::failing(),
        );

        h.source
            .set("phys228", page(&[("PHYS22804040", 0), ("PHYS22804042", 0)]));
        h.monitor.run_cycle().await;
        h.source
            .set("phys228", page(&[("PHYS22804040", 1), ("PHYS22804042", 1)]));
        let report = h.monitor.run_cycle().await;

        assert_eq!(h.notifier.messages().len(), 2);
        assert_eq!(report.alerts.len(), 2);
        assert!(report.saved);
        assert_eq!(h.store.load().await["2263_PHYS22804042"].available, 1);
    }

    #[tokio::test]
    async fn test_load_state_resumes_from_snapshot() {
        let mut h = harness(
            vec![watched("phys228", &["042"], &["042"])],
            RecordingNotifier::default(),
        );

        h.source.set("phys228", page(&[("PHYS22804042", 0)]));
        h.monitor.run_cycle().await;

        // A fresh monitor over the same store picks up where the last left off.
        let mut resumed = Monitor::new(
            vec![watched("phys228", &["042"], &["042"])],
            Duration::from_secs(180),
            Box::new(h.source.clone()),
            SectionParser::new().unwrap(),
            Box::new(h.store.clone()),
            NotificationDispatcher::new(Box::new(h.notifier.clone()), h.logger.clone()),
            h.logger.clone(),
        );
        resumed.load_state().await;

        h.source.set("phys228", page(&[("PHYS22804042", 1)]));
        let report = resumed.run_cycle().await;
        assert_eq!(report.alerts.len(), 1);
    }
}
