//! CDN distributions for frontend environments
//!
//! A web distribution serves a single page application from an origin bucket:
//! unknown paths are rewritten to the root object so client side routing
//! works. An assets distribution serves a versioned bucket of static files.

use shipyard_core::domain::environment::{DomainNameRegistrar, FrontendEnvironment};
use shipyard_core::domain::template::{
    Bucket, CnameRecord, Distribution, ErrorResponse, OriginAccessIdentity, Resource, Token,
};

use crate::error::{AssemblyError, Result};
use crate::naming::logical_id;
use crate::template::TemplateBuilder;

const DEFAULT_ROOT_OBJECT: &str = "index.html";
const VIEWER_PROTOCOL_POLICY: &str = "redirect-to-https";
const SSL_SUPPORT_METHOD: &str = "sni-only";
const MINIMUM_PROTOCOL_VERSION: &str = "TLSv1.2_2018";

/// Hosted zone the distribution records live in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZone {
    pub id: String,
    pub name: String,
}

/// Shared inputs of every distribution in a deployment
pub struct DistributionContext<'a> {
    pub certificate: &'a Token,
    pub hosted_zone: &'a HostedZone,
}

/// Declares the web distribution for `environment` and returns its origin bucket
pub fn web_distribution(
    template: &mut TemplateBuilder,
    environment: &FrontendEnvironment,
    context: &DistributionContext<'_>,
) -> Result<Token> {
    let prefix = logical_id(&[environment.name.as_str(), "WebDistribution"]);
    let primary_alias = primary_alias(environment.name.as_str(), &environment.aliases)?;

    let root_object = environment
        .default_root_object
        .clone()
        .unwrap_or_else(|| DEFAULT_ROOT_OBJECT.to_string());
    let error_object = environment
        .error_root_object
        .clone()
        .unwrap_or_else(|| DEFAULT_ROOT_OBJECT.to_string());

    let bucket = template.add(
        format!("{prefix}OriginBucket"),
        Resource::Bucket(Bucket {
            bucket_name: None,
            versioned: false,
            website_index_document: Some(root_object.clone()),
            website_error_document: Some(error_object),
        }),
    )?;
    let identity = template.add(
        format!("{prefix}OriginAccessIdentity"),
        Resource::OriginAccessIdentity(OriginAccessIdentity {
            comment: format!("Origin Access Identity for {primary_alias}"),
        }),
    )?;

    let distribution_id = format!("{prefix}CloudFrontWebDistribution");
    template.add(
        distribution_id.clone(),
        Resource::Distribution(Distribution {
            comment: format!("Cloudfront Distribution for {primary_alias}"),
            aliases: environment.aliases.clone(),
            origin_bucket: bucket.clone(),
            origin_access_identity: identity,
            price_class: environment.price_class,
            default_root_object: Some(root_object.clone()),
            viewer_protocol_policy: VIEWER_PROTOCOL_POLICY.to_string(),
            certificate: context.certificate.clone(),
            ssl_support_method: SSL_SUPPORT_METHOD.to_string(),
            minimum_protocol_version: MINIMUM_PROTOCOL_VERSION.to_string(),
            allowed_methods: vec!["GET".to_string(), "HEAD".to_string()],
            forward_query_string: true,
            // Routes are resolved by the application itself
            error_responses: vec![ErrorResponse {
                error_code: 404,
                response_code: 200,
                response_page_path: format!("/{root_object}"),
            }],
        }),
    )?;

    register_aliases(
        template,
        &prefix,
        &environment.aliases,
        environment.domain_name_registrar,
        &distribution_id,
        context.hosted_zone,
    )?;

    Ok(bucket)
}

/// Declares the static assets distribution for `environment`, if it has asset aliases
pub fn assets_distribution(
    template: &mut TemplateBuilder,
    environment: &FrontendEnvironment,
    context: &DistributionContext<'_>,
) -> Result<Option<Token>> {
    if environment.assets_aliases.is_empty() {
        return Ok(None);
    }

    let prefix = logical_id(&[environment.name.as_str(), "AssetsDistribution"]);
    let primary_alias = primary_alias(environment.name.as_str(), &environment.assets_aliases)?;

    let bucket = template.add(
        format!("{prefix}Bucket"),
        Resource::Bucket(Bucket {
            versioned: true,
            ..Default::default()
        }),
    )?;
    let identity = template.add(
        format!("{prefix}OriginAccessIdentity"),
        Resource::OriginAccessIdentity(OriginAccessIdentity {
            comment: format!("Origin Access Identity for {primary_alias}"),
        }),
    )?;

    let distribution_id = format!("{prefix}CloudFrontResource");
    template.add(
        distribution_id.clone(),
        Resource::Distribution(Distribution {
            comment: format!("Cloudfront Distribution for {primary_alias}"),
            aliases: environment.assets_aliases.clone(),
            origin_bucket: bucket.clone(),
            origin_access_identity: identity,
            price_class: environment.price_class,
            default_root_object: None,
            viewer_protocol_policy: VIEWER_PROTOCOL_POLICY.to_string(),
            certificate: context.certificate.clone(),
            ssl_support_method: SSL_SUPPORT_METHOD.to_string(),
            minimum_protocol_version: MINIMUM_PROTOCOL_VERSION.to_string(),
            allowed_methods: vec!["GET".to_string(), "HEAD".to_string(), "OPTIONS".to_string()],
            forward_query_string: false,
            error_responses: Vec::new(),
        }),
    )?;

    register_aliases(
        template,
        &prefix,
        &environment.assets_aliases,
        environment.domain_name_registrar,
        &distribution_id,
        context.hosted_zone,
    )?;

    Ok(Some(bucket))
}

fn primary_alias<'a>(environment: &str, aliases: &'a [String]) -> Result<&'a str> {
    aliases.first().map(String::as_str).ok_or_else(|| {
        AssemblyError::Validation(format!(
            "Environment {environment} must declare at least one alias"
        ))
    })
}

/// CNAME records pointing each alias at the distribution, only when the zone is managed here
fn register_aliases(
    template: &mut TemplateBuilder,
    prefix: &str,
    aliases: &[String],
    registrar: Option<DomainNameRegistrar>,
    distribution_id: &str,
    zone: &HostedZone,
) -> Result<()> {
    if registrar != Some(DomainNameRegistrar::Aws) {
        return Ok(());
    }

    for alias in aliases {
        template.add(
            format!("{prefix}{}", logical_id(&[alias.as_str(), "CnameRecord"])),
            Resource::CnameRecord(CnameRecord {
                hosted_zone_id: zone.id.clone(),
                name: alias.clone(),
                value: Token::attribute(distribution_id, "DomainName"),
            }),
        )?;
    }

    Ok(())
}
