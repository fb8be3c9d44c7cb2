use super::*;

#[test]
fn default_bind_addr_targets_the_public_port() {
    assert_eq!(Settings::default().server_bind, "0.0.0.0:8081");
}

#[test]
fn file_config_overrides_bind_addr() {
    let mut settings = Settings::default();
    apply_file_config(&mut settings, "bind_addr = \"127.0.0.1:9090\"\n");
    assert_eq!(settings.server_bind, "127.0.0.1:9090");
}

#[test]
fn unrelated_file_keys_are_ignored() {
    let mut settings = Settings::default();
    apply_file_config(&mut settings, "log_level = \"debug\"\n");
    assert_eq!(settings.server_bind, Settings::default().server_bind);
}

#[test]
fn malformed_file_config_keeps_defaults() {
    let mut settings = Settings::default();
    apply_file_config(&mut settings, "bind_addr = [not toml");
    assert_eq!(settings.server_bind, Settings::default().server_bind);
}
