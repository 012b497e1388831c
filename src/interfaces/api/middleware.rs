use std::time::Instant;

use error_chain::ChainedError;
use iron::AfterMiddleware;
use iron::BeforeMiddleware;
use iron::IronError;
use iron::IronResult;
use iron::Request;
use iron::Response;
use iron::typemap::Key;

use slog::Logger;

use super::super::super::Error;
use super::metrics::REQUESTS_DURATION;


/// Extracts the request method as a string.
fn request_method(request: &Request) -> String {
    request.method.to_string()
}


/// Extracts the request path as a string.
fn request_path(request: &Request) -> String {
    format!("/{}", request.url.path().join("/"))
}


/// Extracts the response status code as a string.
///
/// Responses without a status are reported as "unknown".
fn response_status(response: &Response) -> String {
    response.status
        .map(|status| status.to_u16().to_string())
        .unwrap_or_else(|| String::from("unknown"))
}


/// Seconds elapsed since the request started, if the start was recorded.
fn request_duration(request: &Request) -> Option<f64> {
    request.extensions.get::<RequestStart>().map(|start| {
        let elapsed = start.elapsed();
        elapsed.as_secs() as f64 + f64::from(elapsed.subsec_nanos()) / 1_000_000_000.0
    })
}


/// Full description of a handler error, causes included.
fn error_details(err: &IronError) -> String {
    match err.error.downcast_ref::<Error>() {
        Some(error) => error.display_chain().to_string().trim_end().replace('\n', "; "),
        None => err.error.to_string(),
    }
}


/// Request extension storing when the request started.
struct RequestStart;

impl Key for RequestStart {
    type Value = Instant;
}


/// Iron middleware to log and time processed requests.
///
/// The logger must be linked both before and after the handler.
#[derive(Clone)]
pub struct RequestLogger {
    logger: Logger,
}

impl RequestLogger {
    /// Create a `RequestLogger`.
    pub fn new(logger: Logger) -> RequestLogger {
        RequestLogger { logger }
    }

    fn log(&self, req: &Request, res: &Response, error: Option<String>) {
        let method = request_method(req);
        let path = request_path(req);
        let status = response_status(res);
        let duration = request_duration(req);
        if let Some(duration) = duration {
            REQUESTS_DURATION.with_label_values(&[&method, &status]).observe(duration);
        }
        match error {
            None => info!(
                self.logger, "Request handled";
                "success" => true, "method" => method, "path" => path, "status" => status,
                "duration" => duration
            ),
            Some(error) => info!(
                self.logger, "Request failed";
                "success" => false, "method" => method, "path" => path, "status" => status,
                "duration" => duration, "error" => error
            ),
        }
    }
}

impl BeforeMiddleware for RequestLogger {
    fn before(&self, req: &mut Request) -> IronResult<()> {
        req.extensions.insert::<RequestStart>(Instant::now());
        Ok(())
    }
}

impl AfterMiddleware for RequestLogger {
    fn after(&self, req: &mut Request, res: Response) -> IronResult<Response> {
        self.log(req, &res, None);
        Ok(res)
    }

    fn catch(&self, req: &mut Request, err: IronError) -> IronResult<Response> {
        self.log(req, &err.response, Some(error_details(&err)));
        Err(err)
    }
}
