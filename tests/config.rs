// ABOUTME: Integration tests for configuration parsing and discovery.
// ABOUTME: Tests YAML parsing, config file lookup, destination merging, and derived settings.

use rdeploy::config::*;
use rdeploy::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

const BASE: &str = r#"
remote:
  host: raspberrypi.local
  user: pi
  app_root: /var/rdeploy/demo
  private_key: /keys/id_rsa
"#;

mod parsing {
    use super::*;

    #[test]
    fn parse_full_config() {
        let yaml = r#"
remote:
  host: 192.168.1.40
  port: 2022
  user: deploy
  group: www-data
  app_root: /opt/apps/ticketer
  debugger_path: /opt/vsdbg/vsdbg
  private_key: /keys/deploy
  use_sudo: false
  install_debugger: false
  trust_first_connection: false

publish: true
no_debug: true
use_command_line_args: false
include_wwwroot: true
project: src/Ticketer/Ticketer.csproj
configuration: Release

timeouts:
  command: 10s
  build: 15m
  transfer: 90s

dotnet_program: /usr/share/dotnet/dotnet
scp_program: /usr/bin/scp
ssh_program: /usr/bin/ssh
adapter: ["code", "--debug", "{descriptor}"]
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.remote.port, 2022);
        assert_eq!(config.remote.group.as_deref(), Some("www-data"));
        assert!(!config.remote.use_sudo);
        assert!(config.publish);
        assert!(config.no_debug);
        assert!(!config.use_command_line_args);
        assert!(config.include_wwwroot);
        assert_eq!(
            config.project.as_deref(),
            Some(Path::new("src/Ticketer/Ticketer.csproj"))
        );
        assert_eq!(config.configuration, "Release");
        assert_eq!(config.timeouts.build, Duration::from_secs(900));
        assert_eq!(config.timeouts.transfer, Duration::from_secs(90));
        assert_eq!(config.adapter, vec!["code", "--debug", "{descriptor}"]);

        let target = config.remote.to_target().unwrap();
        assert_eq!(target.login(), "deploy@192.168.1.40");
        assert_eq!(target.group_name(), "www-data");
        assert_eq!(target.remote_debugger(), "/opt/vsdbg/vsdbg");
        assert_eq!(target.debug_dir(), "/opt/apps/ticketer/debug");
    }

    #[test]
    fn missing_remote_returns_error() {
        let result = Config::from_yaml("publish: true\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_remote_field_returns_error() {
        let yaml = BASE.replace("  user: pi\n", "  user: pi\n  hostname: typo\n");
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn invalid_duration_returns_error() {
        let yaml = format!("{BASE}timeouts:\n  build: forever\n");
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn empty_host_is_rejected_at_target_time() {
        let yaml = BASE.replace("raspberrypi.local", "\"  \"");
        let config = Config::from_yaml(&yaml).unwrap();
        assert!(matches!(
            config.remote.to_target(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn root_app_root_is_rejected_at_target_time() {
        let yaml = BASE.replace("/var/rdeploy/demo", "//");
        let config = Config::from_yaml(&yaml).unwrap();
        assert!(matches!(
            config.remote.to_target(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn nested_app_root_is_accepted() {
        let yaml = BASE.replace("/var/rdeploy/demo", "/srv/");
        let config = Config::from_yaml(&yaml).unwrap();
        let target = config.remote.to_target().unwrap();
        assert_eq!(target.debug_dir(), "/srv/debug");
    }
}

mod discovery {
    use super::*;

    #[test]
    fn finds_primary_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), BASE).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.remote.host, "raspberrypi.local");
    }

    #[test]
    fn finds_yaml_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_ALT), BASE).unwrap();

        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn finds_config_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".rdeploy")).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_DIR), BASE).unwrap();

        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn primary_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), BASE).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME_ALT),
            BASE.replace("raspberrypi.local", "other.local"),
        )
        .unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.remote.host, "raspberrypi.local");
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }

    #[test]
    fn init_template_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), Some("lab-pi.lan"), Some("ops"), false).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.remote.host, "lab-pi.lan");
        assert_eq!(config.remote.user, "ops");
        assert!(config.remote.app_root.starts_with("/var/rdeploy/"));
        assert_eq!(config.timeouts.build, Duration::from_secs(600));
    }

    #[test]
    fn init_refuses_existing_without_force() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), None, None, false).unwrap();

        assert!(matches!(
            init_config(dir.path(), None, None, false),
            Err(Error::AlreadyExists(_))
        ));
        assert!(init_config(dir.path(), None, None, true).is_ok());
    }
}

mod destinations {
    use super::*;

    fn with_destinations() -> Config {
        let yaml = format!(
            r#"{BASE}
destinations:
  staging:
    host: staging-pi.lan
    user: ci
    configuration: Release
  arm64:
    host: 10.0.0.8
    port: 2200
    app_root: /srv/demo
    private_key: ~/.ssh/arm64_key
    publish: true
"#
        );
        Config::from_yaml(&yaml).unwrap()
    }

    #[test]
    fn destination_overrides_remote_fields() {
        let staging = with_destinations().for_destination("staging").unwrap();

        assert_eq!(staging.remote.host, "staging-pi.lan");
        assert_eq!(staging.remote.user, "ci");
        assert_eq!(staging.remote.app_root, "/var/rdeploy/demo");
        assert_eq!(staging.configuration, "Release");
        assert!(!staging.publish);
    }

    #[test]
    fn destination_key_is_expanded() {
        temp_env::with_var("HOME", Some("/home/builder"), || {
            let arm64 = with_destinations().for_destination("arm64").unwrap();

            assert_eq!(
                arm64.remote.private_key.as_deref(),
                Some(Path::new("/home/builder/.ssh/arm64_key"))
            );
            assert_eq!(arm64.remote.port, 2200);
            assert!(arm64.publish);
        });
    }

    #[test]
    fn unknown_destination_field_returns_error() {
        let yaml = format!("{BASE}destinations:\n  lab:\n    hots: typo\n");
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn unknown_destination_returns_error() {
        assert!(matches!(
            with_destinations().for_destination("prod"),
            Err(Error::UnknownDestination(name)) if name == "prod"
        ));
    }
}

mod settings {
    use super::*;

    #[test]
    fn deploy_settings_follow_config() {
        let yaml = format!(
            "{BASE}no_debug: true\ninclude_wwwroot: true\nscp_program: /opt/bin/scp\ntimeouts:\n  transfer: 45s\n"
        );
        let config = Config::from_yaml(&yaml).unwrap();
        let settings = config.deploy_settings();

        assert!(settings.no_debug);
        assert!(settings.include_wwwroot);
        assert!(settings.use_command_line_args);
        assert!(settings.prepare.use_sudo);
        assert_eq!(settings.scp_program, "/opt/bin/scp");
        assert_eq!(settings.transfer_timeout, Duration::from_secs(45));
        assert_eq!(settings.command_timeout, Duration::from_secs(30));
    }
}
