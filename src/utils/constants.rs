pub const REQUESTER_LABEL: &str = "Client";
pub const PROVIDER_LABEL: &str = "Driver";
pub const SHARE_CONTACT_MESSAGE: &str = "📞 Share phone number";
pub const SHARE_LOCATION_MESSAGE: &str = "📍 Share location";
pub const REFRESH_MESSAGE: &str = "🔄 Refresh";
pub const FINISH_MESSAGE: &str = "🚪 Finish";
pub const START_MESSAGE: &str = "/start";

pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const CONFIG_PATH_VAR: &str = "PROXIMITY_BOT_CONFIG";
pub const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// WGS-84 ellipsoid, metres.
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;
/// Mean Earth radius, kilometres.
pub const EARTH_RADIUS: f64 = 6371.0088;

/// Telegram allows roughly 30 messages per second per bot:
/// 10 slots of at least 350 ms each stay below that.
pub const MAX_DELIVERIES_IN_FLIGHT: usize = 10;
pub const DELIVERY_SLOT_MILLIS: u64 = 350;
