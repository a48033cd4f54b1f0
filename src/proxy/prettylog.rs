// ============================================================================
// Log Output Functions
// ============================================================================

use crate::proxy::config::Config;
use crate::proxy::END_POINTS;

pub fn log_startup_banner(cfg: &Config) {
    println!("====================================");
    println!("  Modem Proxy Starting");
    println!("====================================");
    println!("Modem host: {}", cfg.modem.host);
    println!("Username: {}", cfg.modem.username);
    println!("Poll interval: {}s", cfg.poller.interval_secs);
    println!("Cooldown after error: {} ticks", cfg.poller.cooldown_ticks);
    println!("Listening on: http://{}", cfg.http.addr());
    println!("------------------------------------");
    for (idx, endpoint) in END_POINTS.iter().enumerate() {
        println!("  [{}] {}", idx + 1, endpoint);
    }
    println!("====================================");
}
