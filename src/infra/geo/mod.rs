pub mod http_geocoder;
pub mod http_zone_lookup;
