use jni_shadow::catalog::JniVersion;
use jni_shadow::config::{MethodFilter, TraceConfig, VersionSelection};
use jni_shadow::TraceError;

#[test]
fn empty_options_use_defaults() {
    let config = TraceConfig::parse("").unwrap();
    assert_eq!(config.version, VersionSelection::Fixed(JniVersion::V1_6));
    assert!(config.filter.allows("GetVersion"));
}

#[test]
fn parses_version_and_filters() {
    let config: TraceConfig = "version=19, include=Call*|NewObject*, exclude=CallVoidMethodA"
        .parse()
        .unwrap();
    assert_eq!(config.version, VersionSelection::Fixed(JniVersion::V19));
    assert!(config.filter.allows("CallIntMethod"));
    assert!(config.filter.allows("NewObjectV"));
    assert!(!config.filter.allows("CallVoidMethodA"));
    assert!(!config.filter.allows("FindClass"));
}

#[test]
fn auto_version() {
    let config = TraceConfig::parse("version=AUTO").unwrap();
    assert_eq!(config.version, VersionSelection::Auto);
}

#[test]
fn rejects_bad_options() {
    for options in ["version=7", "verbose=true", "include", "include=A||B", "exclude=*"] {
        match TraceConfig::parse(options) {
            Err(TraceError::InvalidOption { .. }) => {}
            other => panic!("{options}: unexpected {other:?}"),
        }
    }
}

#[test]
fn exclusion_wins_over_inclusion() {
    let filter = MethodFilter::all().include("Get*").exclude("GetVersion");
    assert!(filter.allows("GetMethodID"));
    assert!(!filter.allows("GetVersion"));
    assert!(!filter.allows("FindClass"));
}
