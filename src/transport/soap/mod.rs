//! Minimal SOAP 1.1 façade over the plant collection.
//!
//! One endpoint (`POST /soap`) parses the envelope, dispatches on the body
//! element's local name and renders the response envelope by hand. Exactly
//! three operations exist: GetAllPlants, AddPlant, UpdatePlant. Anything
//! else, and any malformed envelope, becomes a SOAP Fault.

use crate::storage::plants::StoreError;
use crate::transport::http::types::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

const SOAP_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SERVICE_NS: &str = "http://tempuri.org/";

#[derive(Debug, Clone, PartialEq)]
pub enum SoapOperation {
    GetAllPlants,
    AddPlant {
        name: String,
        location: String,
        humidity: i32,
    },
    UpdatePlant {
        id: i32,
        name: String,
        location: String,
        humidity: i32,
    },
}

/// Parses a SOAP 1.1 request envelope into an operation.
pub fn parse_request(xml: &str) -> Result<SoapOperation, String> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| format!("malformed XML: {}", e))?;

    let body = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "Body")
        .ok_or("envelope has no Body")?;

    let op = body
        .children()
        .find(|n| n.is_element())
        .ok_or("Body has no operation element")?;

    let text = |name: &str| -> Result<String, String> {
        op.children()
            .find(|c| c.is_element() && c.tag_name().name() == name)
            .and_then(|c| c.text())
            .map(|t| t.trim().to_string())
            .ok_or_else(|| format!("missing element <{}>", name))
    };
    // The original contract declared humidity as a double; fractional
    // values truncate to the integer schema used everywhere else.
    let humidity = |raw: String| -> Result<i32, String> {
        raw.parse::<f64>()
            .map(|f| f as i32)
            .map_err(|_| format!("invalid humidity value: {}", raw))
    };

    match op.tag_name().name() {
        "GetAllPlants" => Ok(SoapOperation::GetAllPlants),
        "AddPlant" => Ok(SoapOperation::AddPlant {
            name: text("name")?,
            location: text("location")?,
            humidity: humidity(text("humidity")?)?,
        }),
        "UpdatePlant" => {
            let id = text("id")?
                .parse::<i32>()
                .map_err(|_| "invalid id value".to_string())?;
            Ok(SoapOperation::UpdatePlant {
                id,
                name: text("name")?,
                location: text("location")?,
                humidity: humidity(text("humidity")?)?,
            })
        }
        other => Err(format!("unknown operation: {}", other)),
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn envelope(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <soap:Envelope xmlns:soap=\"{}\"><soap:Body>{}</soap:Body></soap:Envelope>",
        SOAP_NS, body
    )
}

fn fault(code: &str, message: &str) -> String {
    envelope(&format!(
        "<soap:Fault><faultcode>soap:{}</faultcode><faultstring>{}</faultstring></soap:Fault>",
        code,
        escape_xml(message)
    ))
}

fn xml_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        body,
    )
        .into_response()
}

pub async fn soap_handler(State(state): State<AppState>, body: String) -> Response {
    let op = match parse_request(&body) {
        Ok(op) => op,
        Err(e) => {
            return xml_response(StatusCode::INTERNAL_SERVER_ERROR, fault("Client", &e));
        }
    };

    let garden = state.garden.lock().await;

    let result = match op {
        SoapOperation::GetAllPlants => match garden.list_plants().await {
            Ok(plants) => {
                let items: String = plants
                    .iter()
                    .map(|p| {
                        format!(
                            "<Plant><Id>{}</Id><Name>{}</Name><Location>{}</Location>\
                             <RequiredHumidity>{}</RequiredHumidity><LastWatered>{}</LastWatered></Plant>",
                            p.id,
                            escape_xml(&p.name),
                            escape_xml(&p.location),
                            p.required_humidity,
                            p.last_watered.to_rfc3339()
                        )
                    })
                    .collect();
                Ok(format!(
                    "<GetAllPlantsResponse xmlns=\"{}\">{}</GetAllPlantsResponse>",
                    SERVICE_NS, items
                ))
            }
            Err(e) => Err(e),
        },
        SoapOperation::AddPlant {
            name,
            location,
            humidity,
        } => {
            let fields = crate::domain::plant::PlantFields {
                name,
                location,
                required_humidity: humidity,
            };
            match garden.create_plant(&fields).await {
                Ok(plant) => Ok(format!(
                    "<AddPlantResponse xmlns=\"{}\"><Id>{}</Id></AddPlantResponse>",
                    SERVICE_NS, plant.id
                )),
                Err(e) => Err(e),
            }
        }
        SoapOperation::UpdatePlant {
            id,
            name,
            location,
            humidity,
        } => {
            let fields = crate::domain::plant::PlantFields {
                name,
                location,
                required_humidity: humidity,
            };
            match garden.update_plant(id, &fields).await {
                Ok(()) => Ok(format!(
                    "<UpdatePlantResponse xmlns=\"{}\"/>",
                    SERVICE_NS
                )),
                Err(e) => Err(e),
            }
        }
    };

    match result {
        Ok(body) => xml_response(StatusCode::OK, envelope(&body)),
        Err(StoreError::NotFound(id)) => xml_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            fault("Client", &format!("Planta com ID {} não encontrada.", id)),
        ),
        Err(e) => xml_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            fault("Server", &e.to_string()),
        ),
    }
}
