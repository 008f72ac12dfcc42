//! API Gateway HTTP API proxy events, payload format 2.0.
use once_cell::sync::Lazy;

use crate::descriptor::{KeyKind, TypeDescriptor as T};
use crate::error::Result;
use crate::namespace::Namespace;

pub(super) static NAMESPACE: Lazy<Namespace> =
    Lazy::new(|| declare().expect("API Gateway v2 event schemas are well-formed"));

pub fn declare() -> Result<Namespace> {
    let string_map = || T::map_of(KeyKind::Symbol, T::string());

    Namespace::define("ApiGatewayV2HttpApiProxyEvent", |ns| {
        ns.declare("Event", [
            ("version", T::string()),
            ("routeKey", T::string()),
            ("rawPath", T::string()),
            ("rawQueryString", T::string()),
            ("?cookies", T::array_of(T::string())),
            ("headers", string_map()),
            ("requestContext", T::schema("RequestContext")),
            ("isBase64Encoded", T::boolean()),
            ("?body", T::string()),
            ("?pathParameters", string_map()),
            ("?queryStringParameters", string_map()),
            ("?stageVariables", string_map()),
        ])?;

        ns.declare("RequestContext", [
            ("accountId", T::string()),
            ("apiId", T::string()),
            ("?authorizer", T::schema("Authorizer")),
            ("?authentication", T::schema("Authentication")),
            ("domainName", T::string()),
            ("?domainPrefix", T::string()),
            ("http", T::schema("Http")),
            ("requestId", T::string()),
            ("routeKey", T::string()),
            ("stage", T::string()),
            ("time", T::string()),
            ("timeEpoch", T::integer()),
        ])?;

        ns.declare("Authentication", [("clientCert", T::schema("ClientCert"))])?;

        ns.declare("ClientCert", [
            ("clientCertPem", T::string()),
            ("subjectDN", T::string()),
            ("issuerDN", T::string()),
            ("serialNumber", T::string()),
            ("validity", T::schema("Validity")),
        ])?;

        ns.declare("Validity", [("notBefore", T::string()), ("notAfter", T::string())])?;

        ns.declare("Authorizer", [("jwt", T::schema("JwtAuthorizer"))])?;

        ns.declare("JwtAuthorizer", [
            ("claims", string_map()),
            ("scopes", T::array_of(T::string())),
        ])?;

        ns.declare("Http", [
            ("method", T::string()),
            ("path", T::string()),
            ("protocol", T::string()),
            ("?sourceIp", T::string()),
            ("?userAgent", T::string()),
        ])?;

        ns.set_root("Event")?;
        Ok(())
    })
}
