pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
