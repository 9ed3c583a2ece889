use minijinja::{Environment, context};
use swx_core::parse::operation::{HttpMethod, Operation};

use super::line_comments;
use super::request::RequestFragments;
use super::types::OperationTypes;

/// Everything the executor template needs for one operation.
pub struct ExecutorInput<'a> {
    pub op_name: &'a str,
    pub method: HttpMethod,
    pub operation: &'a Operation,
    pub types: &'a OperationTypes,
    pub fragments: &'a RequestFragments,
    pub debug: bool,
}

/// Emit the `<opName>` fetch function wrapping the request fragments.
pub fn emit_executor(input: &ExecutorInput<'_>) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_template("executor.ts.j2", include_str!("../../templates/executor.ts.j2"))?;
    let tmpl = env.get_template("executor.ts.j2")?;

    let operation = input.operation;
    let comments = operation
        .description
        .as_deref()
        .or(operation.summary.as_deref())
        .map(line_comments)
        .unwrap_or_default();

    tmpl.render(context! {
        op_name => input.op_name,
        http_method => input.method.as_str(),
        request_name => &input.types.request_name,
        responses_name => &input.types.responses_name,
        comments => comments,
        deprecated => operation.deprecated.unwrap_or(false),
        path => &input.fragments.path,
        query => &input.fragments.query,
        has_query => input.fragments.has_query,
        headers => &input.fragments.headers,
        body => &input.fragments.body,
        debug => input.debug,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> OperationTypes {
        OperationTypes {
            declarations: Vec::new(),
            request_name: "ListPetsRequest".to_string(),
            responses_name: "ListPetsResponses".to_string(),
            response_names: vec!["ListPets200Response".to_string()],
        }
    }

    fn fragments(has_query: bool) -> RequestFragments {
        RequestFragments {
            path: "  const url = '/pets';".to_string(),
            query: if has_query {
                "  const query = new Array<string>();".to_string()
            } else {
                String::new()
            },
            headers: "  const headers = [] as string[][];".to_string(),
            body: "  const body = undefined;".to_string(),
            has_query,
        }
    }

    #[test]
    fn test_executor_with_debug() {
        let operation = Operation {
            description: Some("Lists pets.\nPaged.".to_string()),
            ..Operation::default()
        };
        let (types, fragments) = (types(), fragments(true));
        let source = emit_executor(&ExecutorInput {
            op_name: "listPets",
            method: HttpMethod::Get,
            operation: &operation,
            types: &types,
            fragments: &fragments,
            debug: true,
        })
        .unwrap();

        assert!(source.starts_with(
            "export const listPets = Object.assign(listPetsExecutor, { debug: false });"
        ));
        assert!(source.contains("// Lists pets.\n// Paged.\nfunction listPetsExecutor(\n  request: ListPetsRequest,"));
        assert!(source.contains("): Promise<ListPetsResponses> {\n  const url = '/pets';\n  const query = new Array<string>();\n  const headers"));
        assert!(source.contains("const urlWithQuery = query.length ? url + '?' + query.join('&') : url;"));
        assert!(source.contains("method: 'GET',"));
        assert!(source.contains("if (listPets.debug) {"));
        assert!(source.contains("as ListPetsResponses;"));
        assert!(!source.contains("@deprecated"));
    }

    #[test]
    fn test_executor_without_debug_or_query() {
        let operation = Operation {
            deprecated: Some(true),
            ..Operation::default()
        };
        let (types, fragments) = (types(), fragments(false));
        let source = emit_executor(&ExecutorInput {
            op_name: "listPets",
            method: HttpMethod::Post,
            operation: &operation,
            types: &types,
            fragments: &fragments,
            debug: false,
        })
        .unwrap();

        assert!(source.starts_with("export const listPets = listPetsExecutor;"));
        assert!(source.contains("/** @deprecated */\nfunction listPetsExecutor("));
        assert!(source.contains("const urlWithQuery = url;"));
        assert!(!source.contains("query.join"));
        assert!(!source.contains(".debug"));
        assert!(source.contains("method: 'POST',"));
    }
}
