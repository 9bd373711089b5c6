//! Tool registry: definitions, input schemas and dispatch
//!
//! Every Sheets operation is exposed under its operation name, plus three
//! diagnostic tools. Arguments are decoded into the operation's argument
//! struct; a shape mismatch is a JSON-RPC `invalid params` error, while
//! missing or empty required fields reach the operation and come back as a
//! `ValidationError` result.

use nango_auth::ConnectionDescriptor;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use sheets_client::SheetsClient;
use tracing::{debug, info};

use crate::diagnostics;
use crate::error::ToolCallError;
use crate::protocol::{McpTool, ToolAnnotations, ToolsCallResponse, ToolsListResponse};

/// Everything a tool call may touch.
pub struct ToolContext {
    pub client: SheetsClient,
    pub connection: ConnectionDescriptor,
}

pub struct ToolRegistry {
    tools: Vec<McpTool>,
    context: ToolContext,
}

impl ToolRegistry {
    pub fn new(context: ToolContext) -> Self {
        Self {
            tools: definitions(),
            context,
        }
    }

    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    pub fn list_response(&self) -> ToolsListResponse {
        ToolsListResponse {
            tools: self.tools.clone(),
            next_cursor: None,
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name.clone()).collect()
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolsCallResponse, ToolCallError> {
        debug!(tool = name, "tool call");
        let client = &self.context.client;

        let response = match name {
            "spreadsheets_create" => {
                respond(name, client.spreadsheets_create(parse(name, arguments)?).await)
            }
            "spreadsheets_get" => respond(name, client.spreadsheets_get(parse(name, arguments)?).await),
            "spreadsheets_batch_update" => respond(
                name,
                client.spreadsheets_batch_update(parse(name, arguments)?).await,
            ),
            "spreadsheets_get_by_data_filter" => respond(
                name,
                client
                    .spreadsheets_get_by_data_filter(parse(name, arguments)?)
                    .await,
            ),
            "values_get" => respond(name, client.values_get(parse(name, arguments)?).await),
            "values_update" => respond(name, client.values_update(parse(name, arguments)?).await),
            "values_append" => respond(name, client.values_append(parse(name, arguments)?).await),
            "values_clear" => respond(name, client.values_clear(parse(name, arguments)?).await),
            "values_batch_get" => respond(name, client.values_batch_get(parse(name, arguments)?).await),
            "values_batch_update" => {
                respond(name, client.values_batch_update(parse(name, arguments)?).await)
            }
            "values_batch_clear" => {
                respond(name, client.values_batch_clear(parse(name, arguments)?).await)
            }
            "values_batch_get_by_data_filter" => respond(
                name,
                client
                    .values_batch_get_by_data_filter(parse(name, arguments)?)
                    .await,
            ),
            "values_batch_update_by_data_filter" => respond(
                name,
                client
                    .values_batch_update_by_data_filter(parse(name, arguments)?)
                    .await,
            ),
            "values_batch_clear_by_data_filter" => respond(
                name,
                client
                    .values_batch_clear_by_data_filter(parse(name, arguments)?)
                    .await,
            ),
            "developer_metadata_get" => {
                respond(name, client.developer_metadata_get(parse(name, arguments)?).await)
            }
            "developer_metadata_search" => respond(
                name,
                client.developer_metadata_search(parse(name, arguments)?).await,
            ),
            "get_server_info" => Ok(ToolsCallResponse::structured(
                diagnostics::server_info(&self.context, self.names()).await,
            )),
            "test_connection" => Ok(ToolsCallResponse::structured(
                diagnostics::test_connection(&self.context).await,
            )),
            "refresh_nango_token" => Ok(ToolsCallResponse::structured(
                diagnostics::refresh_token(&self.context).await,
            )),
            _ => Err(ToolCallError::UnknownTool(name.to_string())),
        }?;

        info!(tool = name, is_error = response.is_error, "tool call finished");
        Ok(response)
    }
}

/// Decode tool arguments. Absent arguments are treated as `{}`.
fn parse<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolCallError> {
    let arguments = if arguments.is_null() {
        Value::Object(Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| ToolCallError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

fn respond<T: Serialize>(
    tool: &str,
    result: sheets_client::Result<T>,
) -> Result<ToolsCallResponse, ToolCallError> {
    match result {
        Ok(record) => serde_json::to_value(record)
            .map(ToolsCallResponse::structured)
            .map_err(|e| ToolCallError::Encode {
                tool: tool.to_string(),
                reason: e.to_string(),
            }),
        Err(e) => Ok(ToolsCallResponse::failure(e.to_json())),
    }
}

/// Minimal JSON Schema builder for tool inputs.
#[derive(Default)]
struct Schema {
    properties: Map<String, Value>,
    required: Vec<&'static str>,
}

impl Schema {
    fn new() -> Self {
        Self::default()
    }

    fn prop(mut self, name: &'static str, schema: Value, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name);
        }
        self
    }

    fn string(self, name: &'static str, description: &str) -> Self {
        self.prop(name, json!({"type": "string", "description": description}), false)
    }

    fn boolean(self, name: &'static str, description: &str) -> Self {
        self.prop(name, json!({"type": "boolean", "description": description}), false)
    }

    fn spreadsheet_id(self) -> Self {
        self.prop(
            "spreadsheet_id",
            json!({"type": "string", "description": "The ID of the spreadsheet"}),
            true,
        )
    }

    fn range(self) -> Self {
        self.prop(
            "range",
            json!({"type": "string", "description": "A1 notation range, e.g. Sheet1!A1:B2"}),
            true,
        )
    }

    fn string_list(self, name: &'static str, description: &str, required: bool) -> Self {
        self.prop(
            name,
            json!({"type": "array", "items": {"type": "string"}, "description": description}),
            required,
        )
    }

    fn object_list(self, name: &'static str, description: &str, required: bool) -> Self {
        self.prop(
            name,
            json!({"type": "array", "items": {"type": "object"}, "description": description}),
            required,
        )
    }

    fn values(self) -> Self {
        self.prop(
            "values",
            json!({
                "type": "array",
                "items": {"type": "array", "items": {}},
                "description": "Rows of cell values (strings, numbers, booleans or null)"
            }),
            true,
        )
    }

    fn read_options(self) -> Self {
        self.string("major_dimension", "ROWS or COLUMNS")
            .string(
                "value_render_option",
                "FORMATTED_VALUE, UNFORMATTED_VALUE or FORMULA",
            )
            .string(
                "date_time_render_option",
                "SERIAL_NUMBER or FORMATTED_STRING",
            )
    }

    fn write_options(self) -> Self {
        self.prop(
            "value_input_option",
            json!({
                "type": "string",
                "enum": ["RAW", "USER_ENTERED"],
                "default": "USER_ENTERED",
                "description": "How input data is interpreted"
            }),
            false,
        )
        .boolean(
            "include_values_in_response",
            "Return the written values in the response",
        )
        .string(
            "response_value_render_option",
            "Render option for returned values",
        )
        .string(
            "response_date_time_render_option",
            "Date/time render option for returned values",
        )
    }

    fn build(self) -> Value {
        json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        })
    }
}

fn read_only() -> ToolAnnotations {
    ToolAnnotations {
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
        open_world_hint: Some(true),
    }
}

fn writes(destructive: bool, idempotent: bool) -> ToolAnnotations {
    ToolAnnotations {
        read_only_hint: Some(false),
        destructive_hint: Some(destructive),
        idempotent_hint: Some(idempotent),
        open_world_hint: Some(true),
    }
}

fn tool(name: &str, description: &str, schema: Schema, annotations: ToolAnnotations) -> McpTool {
    McpTool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: schema.build(),
        annotations: Some(annotations),
    }
}

fn definitions() -> Vec<McpTool> {
    vec![
        tool(
            "spreadsheets_create",
            "Creates a spreadsheet, returning the newly created spreadsheet.",
            Schema::new()
                .string("title", "Spreadsheet title (default \"Untitled spreadsheet\")")
                .string("locale", "Locale, e.g. en_US")
                .string("auto_recalc", "ON_CHANGE, MINUTE or HOUR")
                .string("time_zone", "Time zone, e.g. America/New_York")
                .object_list("sheets", "Initial Sheet objects", false),
            writes(false, false),
        ),
        tool(
            "spreadsheets_get",
            "Returns the spreadsheet at the given ID.",
            Schema::new()
                .spreadsheet_id()
                .string_list("ranges", "Ranges to retrieve", false)
                .boolean("include_grid_data", "Include cell data")
                .string("fields", "Field mask limiting the response"),
            read_only(),
        ),
        tool(
            "spreadsheets_batch_update",
            "Applies one or more updates to the spreadsheet.",
            Schema::new()
                .spreadsheet_id()
                .object_list("requests", "Request objects to apply in order", true)
                .boolean(
                    "include_spreadsheet_in_response",
                    "Return the updated spreadsheet",
                )
                .string_list("response_ranges", "Ranges included in the response", false)
                .boolean("response_include_grid_data", "Include grid data in the response"),
            writes(true, false),
        ),
        tool(
            "spreadsheets_get_by_data_filter",
            "Returns the spreadsheet at the given ID with data filtered by the provided filters.",
            Schema::new()
                .spreadsheet_id()
                .object_list("data_filters", "DataFilter objects", true)
                .boolean("include_grid_data", "Include cell data"),
            read_only(),
        ),
        tool(
            "values_get",
            "Returns a range of values from a spreadsheet.",
            Schema::new().spreadsheet_id().range().read_options(),
            read_only(),
        ),
        tool(
            "values_update",
            "Sets values in a range of a spreadsheet.",
            Schema::new()
                .spreadsheet_id()
                .range()
                .values()
                .string("major_dimension", "ROWS or COLUMNS")
                .write_options(),
            writes(true, true),
        ),
        tool(
            "values_append",
            "Appends values to a spreadsheet.",
            Schema::new()
                .spreadsheet_id()
                .range()
                .values()
                .string("major_dimension", "ROWS or COLUMNS")
                .string("insert_data_option", "OVERWRITE or INSERT_ROWS")
                .write_options(),
            writes(false, false),
        ),
        tool(
            "values_clear",
            "Clears values from a spreadsheet.",
            Schema::new().spreadsheet_id().range(),
            writes(true, true),
        ),
        tool(
            "values_batch_get",
            "Returns one or more ranges of values from a spreadsheet.",
            Schema::new()
                .spreadsheet_id()
                .string_list("ranges", "A1 notation ranges", true)
                .read_options(),
            read_only(),
        ),
        tool(
            "values_batch_update",
            "Sets values in one or more ranges of a spreadsheet.",
            Schema::new()
                .spreadsheet_id()
                .object_list("data", "ValueRange objects to write", true)
                .write_options(),
            writes(true, true),
        ),
        tool(
            "values_batch_clear",
            "Clears one or more ranges of values from a spreadsheet.",
            Schema::new()
                .spreadsheet_id()
                .string_list("ranges", "A1 notation ranges", true),
            writes(true, true),
        ),
        tool(
            "values_batch_get_by_data_filter",
            "Returns one or more ranges of values that match the specified data filters.",
            Schema::new()
                .spreadsheet_id()
                .object_list("data_filters", "DataFilter objects", true)
                .read_options(),
            read_only(),
        ),
        tool(
            "values_batch_update_by_data_filter",
            "Sets values in one or more ranges of a spreadsheet using data filters.",
            Schema::new()
                .spreadsheet_id()
                .object_list("data", "DataFilterValueRange objects to write", true)
                .write_options(),
            writes(true, true),
        ),
        tool(
            "values_batch_clear_by_data_filter",
            "Clears one or more ranges of values from a spreadsheet using data filters.",
            Schema::new()
                .spreadsheet_id()
                .object_list("data_filters", "DataFilter objects", true),
            writes(true, true),
        ),
        tool(
            "developer_metadata_get",
            "Returns the developer metadata with the specified ID.",
            Schema::new().spreadsheet_id().prop(
                "metadata_id",
                json!({"type": "integer", "description": "Developer metadata ID"}),
                true,
            ),
            read_only(),
        ),
        tool(
            "developer_metadata_search",
            "Returns all developer metadata matching the specified DataFilter.",
            Schema::new()
                .spreadsheet_id()
                .object_list("data_filters", "DataFilter objects", true),
            read_only(),
        ),
        tool(
            "get_server_info",
            "Get information about the MCP server and current configuration.",
            Schema::new(),
            read_only(),
        ),
        tool(
            "test_connection",
            "Test the connection to Google Sheets API by creating a minimal spreadsheet.",
            Schema::new(),
            writes(false, false),
        ),
        tool(
            "refresh_nango_token",
            "Manually refresh the access token from Nango.",
            Schema::new(),
            writes(false, false),
        ),
    ]
}
