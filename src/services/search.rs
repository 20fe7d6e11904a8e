// src/services/search.rs

//! Course search client.
//!
//! Fetches the search results page for one watched course.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{SearchConfig, WatchedCourse};
use crate::utils::http;

/// Source of raw search result markup.
#[async_trait]
pub trait SectionSource: Send + Sync {
    /// Fetch the results page for a course, or fail with a transport error.
    async fn fetch_page(&self, course: &WatchedCourse) -> Result<String>;
}

/// Fetches result pages from the course search over HTTP.
pub struct CourseSearchClient {
    base_url: Url,
    client: Client,
}

impl CourseSearchClient {
    /// Create a search client from configuration.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(&config.base_url)?,
            client: http::create_search_client(config)?,
        })
    }

    /// Build the full search URL for a course.
    pub fn search_url(&self, course: &WatchedCourse) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs([
            ("term", course.term.as_str()),
            ("search_type", "A"),
            ("course_sec", course.course_sec.as_str()),
            ("session", "All"),
            ("course_title", ""),
            ("instr_name", ""),
            ("text_info", "All"),
            ("campus", ""),
            ("instrtn_mode", "All"),
            ("time_start_hh", ""),
            ("time_start_ampm", ""),
            ("credit", "Any"),
            ("keyword", ""),
            ("geneduc", ""),
            ("sustainable", ""),
            ("subj_area_code", ""),
            ("college", ""),
        ]);
        url
    }
}

#[async_trait]
impl SectionSource for CourseSearchClient {
    async fn fetch_page(&self, course: &WatchedCourse) -> Result<String> {
        let url = self.search_url(course);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(&course.label, e))?;

        let response = response
            .error_for_status()
            .map_err(|e| AppError::fetch(&course.label, e))?;

        Ok(response.text().await?)
    }
}
