// Web module - HTTP server for the lookup form
//
// Serves one HTML page with the document form and the results area, a JSON
// endpoint with the same data, and the logo image. Each lookup runs the
// blocking licensing client on Tokio's blocking pool.

mod error;
mod handlers;
mod pages;
mod server;
mod state;

#[cfg(test)]
mod tests;

pub use server::start_server;
