use swx_core::error::TransformError;
use swx_core::parse::operation::{HttpMethod, Operation};
use swx_core::parse::parameter::{Parameter, ParameterLocation};
use swx_core::parse::spec::SwaggerSpec;

use super::js_string;
use crate::generator::TypeScriptError;

const MULTIPART: &str = "multipart/form-data";
const URL_ENCODED: &str = "application/x-www-form-urlencoded";
const JSON: &str = "application/json";
const JSON_PATCH: &str = "application/json-patch+json";
const TEXT: &str = "text/plain";

/// Statements assembling one request, ready to be placed in the executor body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFragments {
    /// Declares `url`.
    pub path: String,
    /// Declares `query`; empty when the operation has no query parameters.
    pub query: String,
    /// Declares `headers`.
    pub headers: String,
    /// Declares `body`, pushing a Content-Type header when one applies.
    pub body: String,
    pub has_query: bool,
}

/// Body encodings the executor knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyEncoding {
    Multipart,
    UrlEncoded,
    Json,
    Text,
}

impl BodyEncoding {
    fn for_mime(mime: &str) -> Option<Self> {
        if mime.contains(MULTIPART) {
            Some(BodyEncoding::Multipart)
        } else if mime.contains(URL_ENCODED) {
            Some(BodyEncoding::UrlEncoded)
        } else if mime.contains(JSON) || mime.contains(JSON_PATCH) {
            Some(BodyEncoding::Json)
        } else if mime.contains(TEXT) {
            Some(BodyEncoding::Text)
        } else {
            None
        }
    }
}

/// Build the path, query, header and body statements of an operation from
/// its merged parameters.
pub fn build_request(
    spec: &SwaggerSpec,
    path: &str,
    method: HttpMethod,
    parameters: &[Parameter],
) -> Result<RequestFragments, TypeScriptError> {
    let operation = spec
        .operation(path, method)
        .ok_or_else(|| TransformError::UnknownOperation {
            path: path.to_string(),
            method: method.as_str().to_string(),
        })?;

    let query = query_fragment(parameters);
    Ok(RequestFragments {
        path: path_fragment(spec, path, parameters),
        has_query: !query.is_empty(),
        query,
        headers: headers_fragment(parameters),
        body: body_fragment(spec, operation, path, method, parameters)?,
    })
}

/// The request MIME type: first operation `consumes`, then the document's,
/// then JSON.
pub fn request_mime_type<'a>(spec: &'a SwaggerSpec, operation: &'a Operation) -> &'a str {
    operation
        .consumes
        .first()
        .or_else(|| spec.consumes.first())
        .map(String::as_str)
        .unwrap_or(JSON)
}

fn located<'a>(
    parameters: &'a [Parameter],
    location: ParameterLocation,
) -> impl Iterator<Item = &'a Parameter> {
    parameters.iter().filter(move |p| p.location == location)
}

fn access(name: &str) -> String {
    format!("request[{}]", js_string(name))
}

fn base_url(spec: &SwaggerSpec, path: &str) -> String {
    let origin = spec
        .host
        .as_deref()
        .map(|host| format!("{}://{host}", spec.scheme()))
        .unwrap_or_default();
    let base_path = match spec.base_path.as_deref() {
        Some("/" | "./") if path.starts_with('/') => "",
        Some(base_path) => base_path,
        None => "",
    };
    format!("{origin}{base_path}{path}")
}

fn path_fragment(spec: &SwaggerSpec, path: &str, parameters: &[Parameter]) -> String {
    let url = js_string(&base_url(spec, path));
    let path_params: Vec<&Parameter> = located(parameters, ParameterLocation::Path).collect();
    if path_params.is_empty() {
        return format!("  const url = {url};");
    }

    let mut lines = vec![format!("  let url = {url};")];
    for param in path_params {
        let placeholder = js_string(&format!("{{{}}}", param.name));
        let value = access(&param.name);
        let replace = format!("url = url.replace({placeholder}, {value}.toString());");
        if param.required {
            lines.push(format!("  {replace}"));
        } else {
            lines.push(format!("  if ({value} != null) {{"));
            lines.push(format!("    {replace}"));
            lines.push("  }".to_string());
        }
    }
    lines.join("\n")
}

fn query_fragment(parameters: &[Parameter]) -> String {
    let query_params: Vec<&Parameter> = located(parameters, ParameterLocation::Query).collect();
    if query_params.is_empty() {
        return String::new();
    }

    let mut lines = vec!["  const query = new Array<string>();".to_string()];
    for param in query_params {
        let value = access(&param.name);
        let key = js_string(&format!("{}=", param.name));
        lines.push(format!("  if ({value} != null) {{"));
        if param.is_array() {
            lines.push(format!(
                "    {value}.forEach(v => query.push({key} + encodeURIComponent(String(v))));"
            ));
        } else {
            lines.push(format!(
                "    query.push({key} + encodeURIComponent(String({value})));"
            ));
        }
        lines.push("  }".to_string());
    }
    lines.join("\n")
}

fn headers_fragment(parameters: &[Parameter]) -> String {
    let mut lines = vec!["  const headers = [] as string[][];".to_string()];
    for param in located(parameters, ParameterLocation::Header) {
        let value = access(&param.name);
        let push = format!(
            "headers.push([{}, String({value})]);",
            js_string(&param.name)
        );
        if param.required {
            lines.push(format!("  {push}"));
        } else {
            lines.push(format!("  if ({value} != null) {{"));
            lines.push(format!("    {push}"));
            lines.push("  }".to_string());
        }
    }
    lines.join("\n")
}

fn body_fragment(
    spec: &SwaggerSpec,
    operation: &Operation,
    path: &str,
    method: HttpMethod,
    parameters: &[Parameter],
) -> Result<String, TypeScriptError> {
    if !parameters.iter().any(|p| p.location.is_body()) {
        return Ok("  const body = undefined;".to_string());
    }

    let mime = request_mime_type(spec, operation);
    let encoding =
        BodyEncoding::for_mime(mime).ok_or_else(|| TypeScriptError::UnsupportedMediaType {
            operation: format!("{method} {path}"),
            mime: mime.to_string(),
        })?;

    let form_params: Vec<&Parameter> = located(parameters, ParameterLocation::FormData).collect();
    let body_param = || {
        located(parameters, ParameterLocation::Body)
            .next()
            .ok_or_else(|| TypeScriptError::MissingBodyParameter {
                operation: format!("{method} {path}"),
                mime: mime.to_string(),
            })
    };

    let fragment = match encoding {
        BodyEncoding::Multipart => form_body(&form_params, "new FormData()", MULTIPART),
        BodyEncoding::UrlEncoded => form_body(&form_params, "new URLSearchParams()", URL_ENCODED),
        BodyEncoding::Json => format!(
            "  headers.push(['Content-Type', '{JSON}']);\n  const body = JSON.stringify({});",
            access(&body_param()?.name)
        ),
        BodyEncoding::Text => format!(
            "  headers.push(['Content-Type', '{TEXT}']);\n  const body = {};",
            access(&body_param()?.name)
        ),
    };
    Ok(fragment)
}

fn form_body(form_params: &[&Parameter], constructor: &str, content_type: &str) -> String {
    if form_params.is_empty() {
        return "  const body = undefined;".to_string();
    }

    let mut lines = vec![
        format!("  const form = {constructor};"),
        "  let formFilled = false;".to_string(),
    ];
    for param in form_params {
        let value = access(&param.name);
        // Blobs go in as-is; FormData and URLSearchParams take strings otherwise.
        let appended = if param.type_name() == Some("file") {
            value.clone()
        } else {
            format!("String({value})")
        };
        lines.push(format!("  if ({value} != null) {{"));
        lines.push("    formFilled = true;".to_string());
        lines.push(format!(
            "    form.append({}, {appended});",
            js_string(&param.name)
        ));
        lines.push("  }".to_string());
    }
    lines.push("  const body = formFilled".to_string());
    lines.push(format!(
        "    ? (headers.push(['Content-Type', '{content_type}']), form)"
    ));
    lines.push("    : undefined;".to_string());
    lines.join("\n")
}
