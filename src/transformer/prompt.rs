use serde::Serialize;

use super::context::{OutputFormat, TransformationContext};

const SYSTEM_PREAMBLE: &str = concat!(
    "You are a data transformation expert. Your task is to analyze the input data and ",
    "transform it into a highly contextual format that will be valuable for subsequent AI processing.\n",
    "\n",
    "Key objectives:\n",
    "1. Extract and highlight key information, relationships, and patterns\n",
    "2. Maintain semantic meaning while removing noise and redundancy\n",
    "3. Structure the output in a way that maximizes context understanding\n",
    "4. Preserve important metadata and relationships\n",
    "5. Add relevant contextual information when beneficial\n",
    "\n",
    "Guidelines:\n",
    "- Identify and extract core concepts and entities\n",
    "- Preserve relationships between different data elements\n",
    "- Include relevant metadata that aids understanding\n",
    "- Remove redundant or non-essential information\n",
    "- Structure output in a clear, hierarchical format\n",
    "- Add explanatory context where beneficial",
);

const SYSTEM_CLOSING: &str =
    "\n\nEnsure the output is valid JSON and follows any specified format requirements.";

const USER_PREAMBLE: &str = concat!(
    "Please transform the following data into a rich, contextual format that will be ",
    "valuable for AI processing. \n",
    "Focus on extracting key information, relationships, and patterns while maintaining ",
    "semantic accuracy.\n",
    "\n",
    "Input data:\n",
);

const FIELD_SEPARATOR: &str = ",\n          ";

/// System message: the caller's override verbatim, or the generated instructions with
/// the optional output-format block spliced in before the closing line.
pub(crate) fn system_prompt(context: Option<&TransformationContext>) -> String {
    if let Some(custom) = context.and_then(TransformationContext::system_prompt_override) {
        return custom.to_string();
    }

    let format_block = context
        .and_then(|context| context.output_format.as_ref())
        .map(format_instructions)
        .unwrap_or_default();

    format!("{SYSTEM_PREAMBLE}{format_block}{SYSTEM_CLOSING}")
}

/// Renders each field as `"<name>": "<description> (<type>)"` in declaration order.
pub(crate) fn format_instructions(format: &OutputFormat) -> String {
    let fields = format
        .fields
        .iter()
        .map(|field| {
            format!(
                "\"{}\": \"{} ({})\"",
                field.name, field.description, field.field_type
            )
        })
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR);

    format!("\nExpected output format:\n        {{\n          {fields}\n        }}\n")
}

/// User message: the caller's override verbatim, or the input pretty-printed as JSON
/// (two-space indentation) under a fixed preamble. The input is not serialized when an
/// override is present.
pub(crate) fn user_prompt<I>(
    input: &I,
    context: Option<&TransformationContext>,
) -> Result<String, serde_json::Error>
where
    I: Serialize + ?Sized,
{
    if let Some(custom) = context.and_then(TransformationContext::prompt_override) {
        return Ok(custom.to_string());
    }

    let rendered = serde_json::to_string_pretty(input)?;
    Ok(format!("{USER_PREAMBLE}{rendered}"))
}
