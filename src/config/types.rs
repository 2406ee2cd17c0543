use serde::Deserialize;

/// Main configuration structure for Sumi-Index
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent fetch workers
    pub workers: u32,

    /// The page the crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Links are only followed when they start with this string
    #[serde(rename = "target-domain")]
    pub target_domain: String,

    /// Stop scheduling new links once this many URLs have been admitted
    #[serde(rename = "page-budget")]
    pub page_budget: u32,

    /// Upper bound for a single fetch (milliseconds)
    #[serde(rename = "fetch-timeout", default = "default_fetch_timeout")]
    pub fetch_timeout: u64,

    /// Pause a worker takes after a successful fetch (milliseconds)
    #[serde(rename = "politeness-delay", default = "default_politeness_delay")]
    pub politeness_delay: u64,

    /// Capacity of the channel feeding jobs to workers
    #[serde(rename = "job-queue-capacity", default = "default_queue_capacity")]
    pub job_queue_capacity: u32,

    /// Capacity of the channel carrying results back to the coordinator
    #[serde(rename = "result-queue-capacity", default = "default_queue_capacity")]
    pub result_queue_capacity: u32,
}

fn default_fetch_timeout() -> u64 {
    10_000
}

fn default_politeness_delay() -> u64 {
    500
}

fn default_queue_capacity() -> u32 {
    100
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON index snapshot written at shutdown
    #[serde(rename = "index-path")]
    pub index_path: String,
}
