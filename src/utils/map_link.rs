use crate::model::participant::Coordinates;
use crate::utils::constants::MAP_SEARCH_URL;
use lazy_static::lazy_static;
use url::Url;

lazy_static! {
    static ref MAP_SEARCH_BASE: Url = Url::parse(MAP_SEARCH_URL).unwrap();
}

/// Web-map search URL pointing at `latitude,longitude`.
pub fn make_map_link(location: &Coordinates) -> Url {
    let mut url = MAP_SEARCH_BASE.clone();
    url.set_query(Some(&format!(
        "api=1&query={},{}",
        location.latitude, location.longitude
    )));
    url
}
