//! Traits guest code implements.
//!
//! A plugin is one [`RootContext`] per plugin instance plus one
//! [`HttpContext`] or [`TcpContext`] per stream, created by the root on
//! demand. Every callback receives a [`Hostcalls`] scoped to the context the
//! event belongs to, so host calls made inside it act on that context.
//!
//! All methods have defaults: stream callbacks continue, lifecycle callbacks
//! succeed, everything else does nothing.

use crate::hostcalls::Hostcalls ;
use crate::types::{ Action, PeerType };



/// Callbacks every context can receive.
pub trait Context {

	/// Delivers the response to a callout started with
	/// [`Hostcalls::dispatch_http_call`]. The response headers, body and
	/// trailers are readable through the `get_http_call_response_*` calls for
	/// the duration of this callback only.
	fn on_http_call_response(
		&mut self,
		_host: &mut Hostcalls<'_>,
		_callout_id: u32,
		_num_headers: usize,
		_body_size: usize,
		_num_trailers: usize,
	) {}

	/// The stream finished; fires once, right before the context is deleted.
	fn on_log( &mut self, _host: &mut Hostcalls<'_> ) {}

}

/// The per-plugin context: configuration, timers, queues and stream creation.
pub trait RootContext: Context {

	/// `false` fails the VM start.
	fn on_vm_start( &mut self, _host: &mut Hostcalls<'_>, _vm_configuration_size: usize ) -> bool { true }

	/// `false` rejects the plugin configuration.
	fn on_configure( &mut self, _host: &mut Hostcalls<'_>, _plugin_configuration_size: usize ) -> bool { true }

	fn on_tick( &mut self, _host: &mut Hostcalls<'_> ) {}

	fn on_queue_ready( &mut self, _host: &mut Hostcalls<'_>, _queue_id: u32 ) {}

	/// The plugin is shutting down. Returning `false` defers completion until
	/// the plugin calls [`Hostcalls::done`].
	fn on_done( &mut self, _host: &mut Hostcalls<'_> ) -> bool { true }

	/// Creates the context for a new HTTP stream, or `None` if this plugin
	/// does not filter HTTP.
	fn new_http_context( &mut self, _context_id: u32 ) -> Option<Box<dyn HttpContext>> { None }

	/// Creates the context for a new TCP connection, or `None` if this plugin
	/// does not filter TCP.
	fn new_tcp_context( &mut self, _context_id: u32 ) -> Option<Box<dyn TcpContext>> { None }

}

/// Callbacks of one HTTP stream.
///
/// Returning [`Action::Pause`] holds the stream. For body callbacks the host
/// keeps the bytes seen so far and delivers them again, with the next chunk
/// appended, on the following call.
pub trait HttpContext: Context {

	fn on_http_request_headers( &mut self, _host: &mut Hostcalls<'_>, _num_headers: usize, _end_of_stream: bool ) -> Action { Action::Continue }
	fn on_http_request_body( &mut self, _host: &mut Hostcalls<'_>, _body_size: usize, _end_of_stream: bool ) -> Action { Action::Continue }
	fn on_http_request_trailers( &mut self, _host: &mut Hostcalls<'_>, _num_trailers: usize ) -> Action { Action::Continue }

	fn on_http_response_headers( &mut self, _host: &mut Hostcalls<'_>, _num_headers: usize, _end_of_stream: bool ) -> Action { Action::Continue }
	fn on_http_response_body( &mut self, _host: &mut Hostcalls<'_>, _body_size: usize, _end_of_stream: bool ) -> Action { Action::Continue }
	fn on_http_response_trailers( &mut self, _host: &mut Hostcalls<'_>, _num_trailers: usize ) -> Action { Action::Continue }

}

/// Callbacks of one TCP connection.
pub trait TcpContext: Context {

	fn on_new_connection( &mut self, _host: &mut Hostcalls<'_> ) -> Action { Action::Continue }

	fn on_downstream_data( &mut self, _host: &mut Hostcalls<'_>, _data_size: usize, _end_of_stream: bool ) -> Action { Action::Continue }
	fn on_downstream_close( &mut self, _host: &mut Hostcalls<'_>, _peer: PeerType ) {}

	fn on_upstream_data( &mut self, _host: &mut Hostcalls<'_>, _data_size: usize, _end_of_stream: bool ) -> Action { Action::Continue }
	fn on_upstream_close( &mut self, _host: &mut Hostcalls<'_>, _peer: PeerType ) {}

}
