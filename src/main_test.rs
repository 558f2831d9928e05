use super::*;

#[test]
fn brand_filter_passes_through_for_campaigns() {
    assert_eq!(check_brand_filter(ResourceKind::Campaigns, Some(3)).unwrap(), Some(3));
    assert_eq!(check_brand_filter(ResourceKind::Campaigns, None).unwrap(), None);
}

#[test]
fn brand_filter_is_rejected_for_other_resources() {
    let err = check_brand_filter(ResourceKind::Brands, Some(3)).unwrap_err();
    assert!(matches!(err, CliError::BrandFilterUnsupported(ResourceKind::Brands)));
    assert!(err.to_string().contains("only applies to campaigns"));
}

#[test]
fn no_brand_filter_is_fine_everywhere() {
    assert_eq!(check_brand_filter(ResourceKind::Admins, None).unwrap(), None);
    assert_eq!(check_brand_filter(ResourceKind::Influencers, None).unwrap(), None);
}

#[test]
fn base_url_flag_is_validated() {
    let cli = Cli::try_parse_from(["adminctl", "--base-url", "api.example.test", "login"]).unwrap();
    let err = ClientConfig::parse(cli.base_url.as_deref().unwrap()).map_err(CliError::from).unwrap_err();
    assert!(matches!(err, CliError::Config(ConfigError::Invalid { .. })));
}
