use iron::Handler;
use iron::IronResult;
use iron::Request;
use iron::Response;
use iron::status;

use prometheus::Encoder;
use prometheus::Registry;
use prometheus::TextEncoder;

use super::super::super::super::Result;
use super::super::super::super::ResultExt;


/// Metrics exporter (`/api/v1/metrics`) handler.
///
/// Renders all metrics in the registry using the prometheus text format.
pub struct MetricsHandler {
    registry: Registry,
}

impl MetricsHandler {
    pub fn new(registry: Registry) -> MetricsHandler {
        MetricsHandler { registry }
    }

    fn render(&self) -> Result<(String, Vec<u8>)> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)
            .chain_err(|| "Failed to encode metrics")?;
        Ok((String::from(encoder.format_type()), buffer))
    }
}

impl Handler for MetricsHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        let (format, body) = self.render()?;
        let mut response = Response::with((status::Ok, body));
        response.headers.set_raw("Content-Type", vec![format.into_bytes()]);
        Ok(response)
    }
}
