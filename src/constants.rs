use std::time::Duration;

pub const API_OAUTH_URL: &str = "https://id.twitch.tv";
pub const API_HELIX_URL: &str = "https://api.twitch.tv/helix";

pub const OAUTH_TOKEN_ROUTE: &str = "/oauth2/token";
pub const HELIX_URN_TOP_GAMES: &str = "games/top";
pub const HELIX_URN_STREAMS: &str = "streams";

// helix caps `first` at 100 for both endpoints
pub const PAGE_SIZE: usize = 100;

pub const RATELIMIT_REMAINING_HEADER: &str = "ratelimit-remaining";
pub const RATELIMIT_LIMIT_HEADER: &str = "ratelimit-limit";

/// Remaining-quota floor at which the guard pauses before the next request.
pub const RATELIMIT_FLOOR: u32 = 1;
pub const RATELIMIT_COOLDOWN: Duration = Duration::from_secs(30);

pub const RUN_CADENCE: Duration = Duration::from_secs(60 * 60);
pub const SCHEDULE_POLL: Duration = Duration::from_secs(1);

pub const DEFAULT_OUTPUT_DIR: &str = "./data";
pub const OUTPUT_PREFIX: &str = "top_live_streamers";

/// Month, day, hour, minute, zero-padded. Two runs within the same minute
/// produce the same path and the later one wins.
pub const TIMESTAMP_FORMAT: &str = "%m%d%H%M";
