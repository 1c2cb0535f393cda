use clap::Parser;

use super::*;

fn raw_with_site() -> RawSettings {
    let mut raw = RawSettings::default();
    raw.site.public_url = Some("https://vize.example/".to_string());
    raw
}

#[test]
fn defaults_cover_every_section() {
    let settings = Settings::from_raw(raw_with_site()).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), DEFAULT_PUBLIC_PORT);
    assert_eq!(settings.server.admin_addr.port(), DEFAULT_ADMIN_PORT);
    assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert_eq!(settings.logging.format, LogFormat::Compact);
    assert_eq!(settings.database.max_connections.get(), 8);
    assert!(settings.database.url.is_none());

    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.page_data_ttl, Duration::from_secs(3600));
    assert_eq!(settings.cache.country_data_ttl, Duration::from_secs(3600));
    assert_eq!(settings.cache.response_ttl, Duration::from_secs(7200));

    assert_eq!(settings.site.public_url, "https://vize.example");
    assert_eq!(settings.site.brand_name, "Vize Merkezi");
    assert_eq!(settings.site.source_country_code, "TR");
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = raw_with_site();
    raw.server.public_port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.site.brand_name = Some("Dosya Vize".to_string());

    let overrides = ServeOverrides {
        public_port: Some(4321),
        log_level: Some("debug".to_string()),
        site_brand_name: Some("Vize Noktası".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.site.brand_name, "Vize Noktası");
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = raw_with_site();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.logging.format, LogFormat::Json);
}

#[test]
fn cache_can_be_disabled_from_cli() {
    let mut raw = raw_with_site();
    raw.apply_serve_overrides(&ServeOverrides {
        cache_enabled: Some(false),
        cache_response_ttl_seconds: Some(600),
        ..Default::default()
    });

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(!settings.cache.enabled);
    assert_eq!(settings.cache.response_ttl, Duration::from_secs(600));
}

#[test]
fn public_url_is_required() {
    let err = Settings::from_raw(RawSettings::default()).expect_err("missing site url");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "site.public_url",
            ..
        }
    ));
}

#[test]
fn relative_public_url_is_rejected() {
    let mut raw = RawSettings::default();
    raw.site.public_url = Some("vize.example".to_string());
    assert!(Settings::from_raw(raw).is_err());

    let mut raw = RawSettings::default();
    raw.site.public_url = Some("ftp://vize.example".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn zero_ttl_is_rejected() {
    let mut raw = raw_with_site();
    raw.cache.page_data_ttl_seconds = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero ttl");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.page_data_ttl_seconds",
            ..
        }
    ));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = raw_with_site();
    raw.logging.level = Some("loud".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "logging.level",
            ..
        })
    ));
}

#[test]
fn source_country_code_is_uppercased_and_checked() {
    let mut raw = raw_with_site();
    raw.site.source_country_code = Some("de".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.site.source_country_code, "DE");

    let mut raw = raw_with_site();
    raw.site.source_country_code = Some("TUR".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn shared_listener_address_is_rejected() {
    let mut raw = raw_with_site();
    raw.server.admin_port = Some(DEFAULT_PUBLIC_PORT);
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["vizesayfa"]);
    assert!(args.command.is_none());
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "vizesayfa",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "postgres://override",
        "--cache-enabled",
        "false",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.database_url.as_deref(),
                Some("postgres://override")
            );
            assert_eq!(serve.overrides.cache_enabled, Some(false));
        }
    }
}
