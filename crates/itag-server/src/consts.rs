pub const DEFAULT_BIND: ([u8; 4], u16) = ([0, 0, 0, 0], 3000);
pub const DEFAULT_ENDPOINT: &str = "/api/itag";
pub const DEFAULT_GENERIC_ENDPOINT: &str = "/api/itag/generic";
