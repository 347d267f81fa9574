//! VictoriaMetrics Cloud API access
//!
//! # Module Structure
//!
//! - [`client`] - Client configuration and one typed method per API operation
//! - [`http`] - Request dispatch, status classification and body decoding
//!
//! # Example
//!
//! ```no_run
//! use vmcloud::Client;
//!
//! async fn example() -> vmcloud::Result<()> {
//!     let client = Client::new("your-api-key")?;
//!     for deployment in client.list_deployments().await? {
//!         println!("{} ({})", deployment.name, deployment.status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
