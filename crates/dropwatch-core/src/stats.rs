/// Cumulative monitoring counters, process-lifetime only.
///
/// Never persisted and never reset between cycles; each cycle's summary log
/// reports the totals since process start.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonitorStats {
    /// Renderer requests issued (page renders and JSON fetches).
    pub requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Availability events: variants seen for the first time plus restocks.
    pub variants_found: u64,
    /// Products seen for the first time.
    pub new_products: u64,
}

impl MonitorStats {
    pub fn record_success(&mut self) {
        self.requests += 1;
        self.successful_requests += 1;
    }

    pub fn record_failure(&mut self) {
        self.requests += 1;
        self.failed_requests += 1;
    }
}
