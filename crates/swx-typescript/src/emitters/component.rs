use indexmap::IndexSet;
use minijinja::{Environment, context};
use swx_core::parse::parameter::Parameter;
use swx_core::transform::capitalize;

use super::js_string;
use super::types::OperationTypes;

/// Emit the `<OpName>` render-prop component calling the executor.
pub fn emit_component(
    op_name: &str,
    types: &OperationTypes,
    parameters: &[Parameter],
) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_template(
        "component.tsx.j2",
        include_str!("../../templates/component.tsx.j2"),
    )?;
    let tmpl = env.get_template("component.tsx.j2")?;

    let parameter_names: Vec<String> = parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(js_string)
        .collect();

    tmpl.render(context! {
        op_name => op_name,
        component_name => capitalize(op_name),
        request_name => &types.request_name,
        responses_name => &types.responses_name,
        parameter_names => parameter_names,
    })
}
