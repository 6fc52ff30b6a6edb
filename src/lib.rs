//! Proxy-Wasm plugins without a proxy.
//!
//! A Proxy-Wasm plugin is a WebAssembly module that a proxy (Envoy, and others
//! implementing the same ABI) loads and calls into as traffic flows: once per
//! request header block, once per body chunk, once per connection event. The
//! plugin calls back into the proxy through a fixed set of `proxy_*` host
//! functions to read and rewrite headers, buffer bodies, keep shared state and
//! make outbound calls. `proxy_wasm_link` implements the host side of that
//! contract in memory so plugins can be driven and inspected from ordinary
//! Rust tests.
//!
//! # Core Concepts
//!
//! - [`ProxyHost`]: The host-call surface at the byte level, shaped like the ABI.
//! 	Maps travel encoded with [`encode_map`], property paths NUL-joined.
//!
//! - [`Hostcalls`]: A typed façade over any [`ProxyHost`]. Plugin logic is written
//! 	against this.
//!
//! - [`RootContext`], [`HttpContext`], [`TcpContext`]: The callbacks a plugin
//! 	implements. Every method has a default, so a plugin only overrides what it
//! 	handles.
//!
//! - [`Guest`]: The callback surface the host drives, keyed by context id.
//! 	[`Dispatcher`] routes it to native context objects; [`WasmGuest`] calls the
//! 	exports of a compiled module.
//!
//! - [`HostEmulator`]: The host. It owns the state of every stream, the shared
//! 	key-value store, shared queues, metrics, properties and pending HTTP callouts,
//! 	and exposes a harness API to feed events and inspect the result.
//!
//! # Example
//!
//! ```
//! use proxy_wasm_link::{ Action, Context, Dispatcher, HostEmulator, Hostcalls, HttpContext };
//!
//! // Holds requests back until the whole body has arrived.
//! struct Buffering ;
//! impl Context for Buffering {}
//! impl HttpContext for Buffering {
//! 	fn on_http_request_body( &mut self, _host: &mut Hostcalls<'_>, _body_size: usize, end_of_stream: bool ) -> Action {
//! 		match end_of_stream {
//! 			true => Action::Continue,
//! 			false => Action::Pause,
//! 		}
//! 	}
//! }
//!
//! # fn main() -> Result<(), proxy_wasm_link::DispatchError> {
//! let mut host = HostEmulator::new( Dispatcher::for_http(| _context_id | Buffering ));
//! host.start_plugin()?;
//!
//! let stream = host.initialize_http_context()?;
//! host.call_on_request_headers( stream, [( ":method", "POST" ), ( ":path", "/upload" )], false )?;
//! assert_eq!( host.call_on_request_body( stream, b"abc", false )?, Action::Pause );
//! assert_eq!( host.call_on_request_body( stream, b"def", true )?, Action::Continue );
//! assert_eq!( host.get_current_request_body( stream ), b"abcdef" );
//!
//! host.complete_http_context( stream )?;
//! # Ok(())
//! # }
//! ```
//!
//! # Compiled Plugins
//!
//! [`WasmGuest`] instantiates a module with wasmtime, links the `proxy_*`
//! imports to the emulator and translates `proxy_on_*` exports into [`Guest`]
//! calls. Give it a fuel budget per callback to stop runaway plugins; the engine
//! must then be created with [`Config::consume_fuel`].
//!
//! ```
//! use proxy_wasm_link::{ Config, DispatchError, Engine, HostEmulator, Module, WasmGuest };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::new();
//! config.consume_fuel( true );
//! let engine = Engine::new( &config )?;
//! let module = Module::new( &engine, r#"(module
//! 	(memory (export "memory") 1)
//! 	(func (export "proxy_on_context_create") (param i32 i32))
//! 	(func (export "proxy_on_tick") (param i32) (loop br 0))
//! )"# )?;
//!
//! let guest = WasmGuest::new( &engine, &module )?.with_fuel_per_callback( 10_000 );
//! let mut host = HostEmulator::new( guest );
//! host.start_plugin()?;
//! assert!( matches!( host.tick(), Err( DispatchError::RuntimeException( _ ))));
//! # Ok(())
//! # }
//! ```
//!
//! # Re-exports
//!
//! `proxy_wasm_link` re-exports `Engine`, `Module` and `Config` from `wasmtime`
//! for convenience. See the [wasmtime docs](https://docs.rs/wasmtime/latest/wasmtime/)
//! for details.

mod types ;
mod error ;
mod marshal ;
mod header_map ;
mod host ;
mod hostcalls ;
mod context ;
mod dispatcher ;
mod stream ;
mod memory ;
mod wasm_guest ;
pub mod emulator ;

#[doc( no_inline )]
pub use wasmtime::{ Config, Engine, Module };

pub use types::{ Action, BufferType, LogLevel, MapType, MetricType, PeerType, Status, StreamType };
pub use error::{ DispatchError, HostError, HostResult };
pub use marshal::{ decode_map, encode_map, encode_property_path, PropertyPath };
pub use header_map::HeaderMap ;
pub use host::{ HostBytes, ProxyHost };
pub use hostcalls::Hostcalls ;
pub use context::{ Context, HttpContext, RootContext, TcpContext };
pub use dispatcher::{ Dispatcher, Guest };
pub use stream::{ read_window, BodyBuffer, Direction, Lifecycle, LocalResponse, Phase, StreamKind, StreamState };
pub use emulator::{ EmulatorOptions, HostEmulator, HostSession, HostState, HttpCalloutAttributes, ROOT_CONTEXT_ID };
pub use wasm_guest::WasmGuest ;
