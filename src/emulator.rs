//! An in-memory Proxy-Wasm host for testing plugins without a proxy.
//!
//! [`HostEmulator`] plays the proxy's part: it owns all host state, creates
//! contexts, feeds streams to the guest one event at a time and records what
//! the guest did in response. The guest is anything implementing
//! [`Guest`]: a native [`Dispatcher`] or a compiled
//! [`WasmGuest`]( crate::WasmGuest ).
//!
//! ```
//! use proxy_wasm_link::{ Action, Context, Dispatcher, HostEmulator, Hostcalls, HttpContext };
//!
//! struct AddHeader ;
//! impl Context for AddHeader {}
//! impl HttpContext for AddHeader {
//! 	fn on_http_request_headers( &mut self, host: &mut Hostcalls<'_>, _: usize, _: bool ) -> Action {
//! 		let _ = host.add_http_request_header( "x-filtered", "yes" );
//! 		Action::Continue
//! 	}
//! }
//!
//! # fn main() -> Result<(), proxy_wasm_link::DispatchError> {
//! let mut host = HostEmulator::new( Dispatcher::for_http(| _ | AddHeader ));
//! host.start_plugin()?;
//! let stream = host.initialize_http_context()?;
//! let action = host.call_on_request_headers( stream, [( ":path", "/" )], false )?;
//! assert_eq!( action, Action::Continue );
//! assert_eq!( host.get_current_request_headers( stream ).get( "x-filtered" ), Some( "yes" ));
//! host.complete_http_context( stream )?;
//! # Ok(())
//! # }
//! ```
//!
//! Misusing the harness itself (an id that was never handed out, headers
//! delivered twice) panics. Errors are reserved for what the guest did.

mod options ;
mod session ;
mod state ;

pub use options::EmulatorOptions ;
pub use session::HostSession ;
pub use state::{ HostState, HttpCalloutAttributes, ROOT_CONTEXT_ID };
use state::CalloutResponse ;

use std::time::Duration ;

use crate::dispatcher::{ Dispatcher, Guest };
use crate::error::{ DispatchError, HostError, HostResult };
use crate::header_map::HeaderMap ;
use crate::host::ProxyHost ;
use crate::marshal::encode_property_path ;
use crate::stream::{ LocalResponse, StreamKind, StreamState };
use crate::types::{ Action, LogLevel, MetricType, PeerType, StreamType };



/// The emulated host together with the guest it drives.
#[derive( Debug )]
pub struct HostEmulator<G = Dispatcher> {
	state: HostState,
	guest: G,
}

impl<G: Guest> HostEmulator<G> {

	/// An emulator with default options.
	pub fn new( guest: G ) -> Self { Self::with_options( guest, EmulatorOptions::new() ) }

	pub fn with_options( guest: G, options: EmulatorOptions ) -> Self {
		Self { state: options.into(), guest }
	}

	#[inline] pub fn guest( &self ) -> &G { &self.guest }
	#[inline] pub fn guest_mut( &mut self ) -> &mut G { &mut self.guest }

	fn dispatch<T>(
		&mut self,
		context_id: u32,
		call: impl FnOnce( &mut G, &mut HostSession<'_> ) -> Result<T, DispatchError>,
	) -> Result<T, DispatchError> {
		let mut session = HostSession::new( &mut self.state, context_id );
		let result = call( &mut self.guest, &mut session );
		if let Err( error ) = &result {
			tracing::debug!( context_id, %error, "guest callback failed" );
		}
		result
	}

	fn ensure_root( &mut self ) -> Result<(), DispatchError> {
		if self.state.root_created { return Ok(()) }
		self.state.last_context_id = self.state.last_context_id.max( ROOT_CONTEXT_ID );
		self.dispatch( ROOT_CONTEXT_ID, | guest, host | guest.on_context_create( host, ROOT_CONTEXT_ID, 0 ))?;
		self.state.root_created = true ;
		Ok(())
	}

	/// Starts the VM: creates the root context if needed and delivers `on_vm_start`.
	///
	/// # Errors
	/// When the guest fails the callback.
	pub fn start_vm( &mut self ) -> Result<bool, DispatchError> {
		self.ensure_root()?;
		let size = self.state.vm_configuration.len();
		tracing::trace!( size, "on_vm_start" );
		self.dispatch( ROOT_CONTEXT_ID, | guest, host | guest.on_vm_start( host, ROOT_CONTEXT_ID, size ))
	}

	/// Starts the plugin: creates the root context if needed and delivers `on_configure`.
	///
	/// # Errors
	/// When the guest fails the callback.
	pub fn start_plugin( &mut self ) -> Result<bool, DispatchError> {
		self.ensure_root()?;
		let size = self.state.plugin_configuration.len();
		tracing::trace!( size, "on_configure" );
		self.dispatch( ROOT_CONTEXT_ID, | guest, host | guest.on_configure( host, ROOT_CONTEXT_ID, size ))
	}

	/// Delivers `on_done` to the root context. `false` means the plugin will
	/// finish later by calling `done`; see [`is_done`]( Self::is_done ).
	///
	/// # Errors
	/// When the guest fails the callback.
	pub fn finish_plugin( &mut self ) -> Result<bool, DispatchError> {
		self.ensure_root()?;
		let finished = self.dispatch( ROOT_CONTEXT_ID, | guest, host | guest.on_done( host, ROOT_CONTEXT_ID ))?;
		if finished { self.state.done = true }
		Ok( finished )
	}

	/// Whether the plugin has finished shutting down.
	#[inline] pub fn is_done( &self ) -> bool { self.state.done }

	fn open_stream( &mut self, kind: StreamKind ) -> Result<u32, DispatchError> {
		self.ensure_root()?;
		let context_id = self.state.next_context_id();
		self.state.streams.insert( context_id, StreamState::new( kind ));
		tracing::trace!( context_id, ?kind, "on_context_create" );
		self.dispatch( context_id, | guest, host | guest.on_context_create( host, context_id, ROOT_CONTEXT_ID ))?;
		Ok( context_id )
	}

	fn stream( &self, context_id: u32 ) -> &StreamState {
		match self.state.streams.get( &context_id ) {
			Some( stream ) => stream,
			None => panic!( "invalid context id: {context_id}" ),
		}
	}

	fn stream_mut( &mut self, context_id: u32 ) -> &mut StreamState {
		match self.state.streams.get_mut( &context_id ) {
			Some( stream ) => stream,
			None => panic!( "invalid context id: {context_id}" ),
		}
	}

	fn open_direction( &mut self, context_id: u32, kind: StreamKind, direction: StreamType ) -> Result<&mut StreamState, DispatchError> {
		let stream = self.stream_mut( context_id );
		assert_eq!( stream.kind(), kind, "context {context_id} is not a {kind:?} stream" );
		stream.ensure_open( context_id, direction )?;
		Ok( stream )
	}

	fn deliver_headers(
		&mut self,
		context_id: u32,
		direction: StreamType,
		headers: HeaderMap,
		end_of_stream: bool,
	) -> Result<Action, DispatchError> {
		let count = self.open_direction( context_id, StreamKind::Http, direction )?.receive_headers( direction, headers );
		tracing::trace!( context_id, %direction, count, end_of_stream, "headers" );
		let action = self.dispatch( context_id, | guest, host | match direction {
			StreamType::Request => guest.on_request_headers( host, context_id, count, end_of_stream ),
			_ => guest.on_response_headers( host, context_id, count, end_of_stream ),
		})?;
		self.stream_mut( context_id ).record( direction, action );
		Ok( action )
	}

	fn deliver_body(
		&mut self,
		context_id: u32,
		kind: StreamKind,
		direction: StreamType,
		chunk: &[u8],
		end_of_stream: bool,
	) -> Result<Action, DispatchError> {
		let size = self.open_direction( context_id, kind, direction )?.receive_body( direction, chunk );
		tracing::trace!( context_id, %direction, size, end_of_stream, "body" );
		let result = self.dispatch( context_id, | guest, host | match direction {
			StreamType::Request => guest.on_request_body( host, context_id, size, end_of_stream ),
			StreamType::Response => guest.on_response_body( host, context_id, size, end_of_stream ),
			StreamType::Downstream => guest.on_downstream_data( host, context_id, size, end_of_stream ),
			StreamType::Upstream => guest.on_upstream_data( host, context_id, size, end_of_stream ),
		});
		match result {
			Ok( action ) => {
				self.stream_mut( context_id ).settle_body( direction, action );
				Ok( action )
			}
			Err( error ) => {
				self.stream_mut( context_id ).keep_body( direction );
				Err( error )
			}
		}
	}

	fn deliver_trailers( &mut self, context_id: u32, direction: StreamType, trailers: HeaderMap ) -> Result<Action, DispatchError> {
		let count = self.open_direction( context_id, StreamKind::Http, direction )?.receive_trailers( direction, trailers );
		tracing::trace!( context_id, %direction, count, "trailers" );
		let action = self.dispatch( context_id, | guest, host | match direction {
			StreamType::Request => guest.on_request_trailers( host, context_id, count ),
			_ => guest.on_response_trailers( host, context_id, count ),
		})?;
		self.stream_mut( context_id ).record( direction, action );
		Ok( action )
	}

	fn complete( &mut self, context_id: u32, kind: StreamKind ) -> Result<(), DispatchError> {
		let stream = self.stream( context_id );
		assert_eq!( stream.kind(), kind, "context {context_id} is not a {kind:?} stream" );
		if stream.is_deleted() { return Err( DispatchError::ContextDeleted( context_id )) }
		let logged = self.dispatch( context_id, | guest, host | guest.on_log( host, context_id ));
		self.stream_mut( context_id ).mark_completed();
		let deleted = self.dispatch( context_id, | guest, host | guest.on_delete( host, context_id ));
		self.stream_mut( context_id ).mark_deleted();
		tracing::trace!( context_id, "context deleted" );
		logged.and( deleted )
	}

	/// Creates an HTTP stream context and returns its id.
	///
	/// # Errors
	/// When the guest fails `on_context_create`.
	pub fn initialize_http_context( &mut self ) -> Result<u32, DispatchError> {
		self.open_stream( StreamKind::Http )
	}

	/// Delivers request headers and returns the guest's action.
	///
	/// # Errors
	/// [`DispatchError::ContextDeleted`] after completion,
	/// [`DispatchError::StreamClosed`] after the guest closed the request,
	/// or whatever the guest fails with.
	///
	/// # Panics
	/// For an unknown id, a TCP stream or headers delivered twice.
	pub fn call_on_request_headers<K, V>(
		&mut self,
		context_id: u32,
		headers: impl IntoIterator<Item = ( K, V )>,
		end_of_stream: bool,
	) -> Result<Action, DispatchError>
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{
		self.deliver_headers( context_id, StreamType::Request, HeaderMap::from_pairs( headers ), end_of_stream )
	}

	/// Response counterpart of [`call_on_request_headers`]( Self::call_on_request_headers ).
	///
	/// # Errors
	/// As for request headers.
	///
	/// # Panics
	/// As for request headers.
	pub fn call_on_response_headers<K, V>(
		&mut self,
		context_id: u32,
		headers: impl IntoIterator<Item = ( K, V )>,
		end_of_stream: bool,
	) -> Result<Action, DispatchError>
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{
		self.deliver_headers( context_id, StreamType::Response, HeaderMap::from_pairs( headers ), end_of_stream )
	}

	/// Delivers a request body chunk. The guest sees it appended to whatever
	/// it paused on before; pausing again retains the lot, continuing releases it.
	///
	/// # Errors
	/// As for headers.
	///
	/// # Panics
	/// For an unknown id, a TCP stream or a body after trailers.
	pub fn call_on_request_body( &mut self, context_id: u32, chunk: &[u8], end_of_stream: bool ) -> Result<Action, DispatchError> {
		self.deliver_body( context_id, StreamKind::Http, StreamType::Request, chunk, end_of_stream )
	}

	/// # Errors
	/// As for headers.
	///
	/// # Panics
	/// For an unknown id, a TCP stream or a body after trailers.
	pub fn call_on_response_body( &mut self, context_id: u32, chunk: &[u8], end_of_stream: bool ) -> Result<Action, DispatchError> {
		self.deliver_body( context_id, StreamKind::Http, StreamType::Response, chunk, end_of_stream )
	}

	/// # Errors
	/// As for headers.
	///
	/// # Panics
	/// For an unknown id, a TCP stream or trailers delivered twice.
	pub fn call_on_request_trailers<K, V>( &mut self, context_id: u32, trailers: impl IntoIterator<Item = ( K, V )> ) -> Result<Action, DispatchError>
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{
		self.deliver_trailers( context_id, StreamType::Request, HeaderMap::from_pairs( trailers ))
	}

	/// # Errors
	/// As for headers.
	///
	/// # Panics
	/// For an unknown id, a TCP stream or trailers delivered twice.
	pub fn call_on_response_trailers<K, V>( &mut self, context_id: u32, trailers: impl IntoIterator<Item = ( K, V )> ) -> Result<Action, DispatchError>
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{
		self.deliver_trailers( context_id, StreamType::Response, HeaderMap::from_pairs( trailers ))
	}

	/// Ends the stream: `on_log`, then `on_delete`, each exactly once.
	/// Both fire even if the first fails.
	///
	/// # Errors
	/// [`DispatchError::ContextDeleted`] when already completed, or the first
	/// failure of the two callbacks.
	///
	/// # Panics
	/// For an unknown id or a TCP stream.
	pub fn complete_http_context( &mut self, context_id: u32 ) -> Result<(), DispatchError> {
		self.complete( context_id, StreamKind::Http )
	}

	/// Opens a TCP connection: creates its context and delivers `on_new_connection`.
	///
	/// # Errors
	/// When the guest fails either callback.
	pub fn initialize_connection( &mut self ) -> Result<( u32, Action ), DispatchError> {
		let context_id = self.open_stream( StreamKind::Tcp )?;
		let action = self.dispatch( context_id, | guest, host | guest.on_new_connection( host, context_id ))?;
		self.stream_mut( context_id ).record( StreamType::Downstream, action );
		Ok(( context_id, action ))
	}

	/// # Errors
	/// As for HTTP bodies.
	///
	/// # Panics
	/// For an unknown id or an HTTP stream.
	pub fn call_on_downstream_data( &mut self, context_id: u32, data: &[u8], end_of_stream: bool ) -> Result<Action, DispatchError> {
		self.deliver_body( context_id, StreamKind::Tcp, StreamType::Downstream, data, end_of_stream )
	}

	/// # Errors
	/// As for HTTP bodies.
	///
	/// # Panics
	/// For an unknown id or an HTTP stream.
	pub fn call_on_upstream_data( &mut self, context_id: u32, data: &[u8], end_of_stream: bool ) -> Result<Action, DispatchError> {
		self.deliver_body( context_id, StreamKind::Tcp, StreamType::Upstream, data, end_of_stream )
	}

	/// The downstream peer went away.
	///
	/// # Errors
	/// As for HTTP bodies.
	///
	/// # Panics
	/// For an unknown id or an HTTP stream.
	pub fn close_downstream( &mut self, context_id: u32 ) -> Result<(), DispatchError> {
		self.open_direction( context_id, StreamKind::Tcp, StreamType::Downstream )?.close( StreamType::Downstream );
		self.dispatch( context_id, | guest, host | guest.on_downstream_connection_close( host, context_id, PeerType::Local ))
	}

	/// The upstream peer went away.
	///
	/// # Errors
	/// As for HTTP bodies.
	///
	/// # Panics
	/// For an unknown id or an HTTP stream.
	pub fn close_upstream( &mut self, context_id: u32 ) -> Result<(), DispatchError> {
		self.open_direction( context_id, StreamKind::Tcp, StreamType::Upstream )?.close( StreamType::Upstream );
		self.dispatch( context_id, | guest, host | guest.on_upstream_connection_close( host, context_id, PeerType::Local ))
	}

	/// TCP counterpart of [`complete_http_context`]( Self::complete_http_context ).
	///
	/// # Errors
	/// As for HTTP streams.
	///
	/// # Panics
	/// For an unknown id or an HTTP stream.
	pub fn complete_connection( &mut self, context_id: u32 ) -> Result<(), DispatchError> {
		self.complete( context_id, StreamKind::Tcp )
	}

	/// # Panics
	/// For an unknown id.
	pub fn get_current_http_stream_action( &self, context_id: u32 ) -> Action { self.stream( context_id ).action() }

	/// # Panics
	/// For an unknown id.
	pub fn get_current_request_headers( &self, context_id: u32 ) -> &HeaderMap { self.stream( context_id ).direction( StreamType::Request ).headers() }

	/// # Panics
	/// For an unknown id.
	pub fn get_current_response_headers( &self, context_id: u32 ) -> &HeaderMap { self.stream( context_id ).direction( StreamType::Response ).headers() }

	/// # Panics
	/// For an unknown id.
	pub fn get_current_request_trailers( &self, context_id: u32 ) -> &HeaderMap { self.stream( context_id ).direction( StreamType::Request ).trailers() }

	/// # Panics
	/// For an unknown id.
	pub fn get_current_response_trailers( &self, context_id: u32 ) -> &HeaderMap { self.stream( context_id ).direction( StreamType::Response ).trailers() }

	/// The request body as the guest last left it.
	///
	/// # Panics
	/// For an unknown id.
	pub fn get_current_request_body( &self, context_id: u32 ) -> &[u8] { self.stream( context_id ).direction( StreamType::Request ).body().visible() }

	/// # Panics
	/// For an unknown id.
	pub fn get_current_response_body( &self, context_id: u32 ) -> &[u8] { self.stream( context_id ).direction( StreamType::Response ).body().visible() }

	/// The bytes a paused direction is holding back.
	///
	/// # Panics
	/// For an unknown id.
	pub fn get_retained_body( &self, context_id: u32, direction: StreamType ) -> &[u8] { self.stream( context_id ).direction( direction ).body().retained() }

	/// Downstream or upstream data as the guest last left it.
	///
	/// # Panics
	/// For an unknown id.
	pub fn get_current_data( &self, context_id: u32, direction: StreamType ) -> &[u8] { self.stream( context_id ).direction( direction ).body().visible() }

	/// The full state of a stream, for assertions the accessors above do not cover.
	///
	/// # Panics
	/// For an unknown id.
	pub fn get_stream( &self, context_id: u32 ) -> &StreamState { self.stream( context_id ) }

	/// # Panics
	/// For an unknown id.
	pub fn get_sent_local_response( &self, context_id: u32 ) -> Option<&LocalResponse> { self.stream( context_id ).local_response() }

	/// Callouts `context_id` has started that are still waiting for a response.
	///
	/// # Panics
	/// For an id that is neither the root context nor a stream.
	pub fn get_callout_attributes_from_context( &self, context_id: u32 ) -> Vec<&HttpCalloutAttributes> {
		assert!(
			context_id == ROOT_CONTEXT_ID || self.state.streams.contains_key( &context_id ),
			"invalid context id: {context_id}",
		);
		self.state.callouts.values().filter(| callout | callout.context_id == context_id ).collect()
	}

	/// Answers a callout: `on_http_call_response` is delivered to the context
	/// that started it, with the response readable through the callout map and
	/// buffer types for the duration of that callback.
	///
	/// # Errors
	/// [`DispatchError::ContextDeleted`] when the caller is gone, or whatever
	/// the guest fails with.
	///
	/// # Panics
	/// For an unknown or already answered callout id.
	pub fn resolve_http_call<K, V>(
		&mut self,
		callout_id: u32,
		headers: impl IntoIterator<Item = ( K, V )>,
		body: &[u8],
		trailers: impl IntoIterator<Item = ( K, V )>,
	) -> Result<(), DispatchError>
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{

		let Some( callout ) = self.state.callouts.remove( &callout_id ) else { panic!( "invalid callout id: {callout_id}" ) };
		let context_id = callout.context_id ;
		if !self.state.is_live( context_id ) { return Err( DispatchError::ContextDeleted( context_id )) }

		let response = CalloutResponse {
			headers: HeaderMap::from_pairs( headers ),
			body: body.to_vec(),
			trailers: HeaderMap::from_pairs( trailers ),
		};
		let ( num_headers, body_size, num_trailers ) = ( response.headers.len(), response.body.len(), response.trailers.len() );

		tracing::trace!( context_id, callout_id, upstream = %callout.upstream, "on_http_call_response" );
		self.state.callout_response = Some( response );
		let result = self.dispatch( context_id, | guest, host | {
			guest.on_http_call_response( host, context_id, callout_id, num_headers, body_size, num_trailers )
		});
		self.state.callout_response = None ;
		result

	}

	/// Fires `on_tick` on the root context.
	///
	/// # Errors
	/// When the guest fails the callback.
	pub fn tick( &mut self ) -> Result<(), DispatchError> {
		self.ensure_root()?;
		self.dispatch( ROOT_CONTEXT_ID, | guest, host | guest.on_tick( host, ROOT_CONTEXT_ID ))
	}

	/// The period the guest asked for; zero when ticking is off.
	#[inline] pub fn get_tick_period( &self ) -> Duration { self.state.tick_period }

	/// Fires `on_queue_ready` on the root context.
	///
	/// # Errors
	/// [`HostError::NotFound`]( HostError::NotFound ) for a queue nobody
	/// registered, or whatever the guest fails with.
	pub fn call_on_queue_ready( &mut self, queue_id: u32 ) -> Result<(), DispatchError> {
		self.state.queue( queue_id )?;
		self.ensure_root()?;
		self.dispatch( ROOT_CONTEXT_ID, | guest, host | guest.on_queue_ready( host, ROOT_CONTEXT_ID, queue_id ))
	}

	/// Number of items waiting in a queue.
	///
	/// # Errors
	/// [`HostError::NotFound`]( HostError::NotFound ) for an unknown queue.
	pub fn get_queue_size( &self, queue_id: u32 ) -> HostResult<usize> {
		self.state.queue( queue_id ).map(| queue | queue.items.len() )
	}

	/// The value stored under `key` in the shared key-value store and its cas.
	///
	/// # Errors
	/// [`HostError::NotFound`]( HostError::NotFound ) for a missing key.
	pub fn get_shared_data( &self, key: &str ) -> HostResult<( &[u8], u32 )> {
		self.state.shared_data.get( key.as_bytes() )
			.map(| entry | ( entry.value.as_slice(), entry.cas ))
			.ok_or( HostError::NotFound )
	}

	/// Messages the guest logged at `level`, oldest first.
	pub fn get_logs( &self, level: LogLevel ) -> &[String] {
		self.state.logs.get( &level ).map_or( &[], Vec::as_slice )
	}

	/// Current value of the metric defined as `( metric_type, name )`.
	///
	/// # Errors
	/// [`HostError::NotFound`]( HostError::NotFound ) when the guest never defined it.
	pub fn get_metric( &self, metric_type: MetricType, name: &str ) -> HostResult<u64> {
		self.state.metrics.iter()
			.find(| metric | metric.metric_type == metric_type && metric.name == name )
			.map(| metric | metric.value )
			.ok_or( HostError::NotFound )
	}

	/// Reads a property as a guest would.
	///
	/// # Errors
	/// [`HostError::BadArgument`]( HostError::BadArgument ) for an empty
	/// path, [`HostError::NotFound`]( HostError::NotFound ) when unset.
	pub fn get_property( &mut self, path: &[&str] ) -> HostResult<Vec<u8>> {
		let path = encode_property_path( path )?;
		HostSession::new( &mut self.state, ROOT_CONTEXT_ID ).get_property( &path ).map(| value | value.into_vec() )
	}

	/// Writes a property as a guest would.
	///
	/// # Errors
	/// [`HostError::BadArgument`]( HostError::BadArgument ) for an empty path or value.
	pub fn set_property( &mut self, path: &[&str], value: &[u8] ) -> HostResult<()> {
		if value.is_empty() { return Err( HostError::BadArgument ) }
		let path = encode_property_path( path )?;
		HostSession::new( &mut self.state, ROOT_CONTEXT_ID ).set_property( &path, value )
	}

	/// The whole host state, for assertions the accessors above do not cover.
	#[inline] pub fn state( &self ) -> &HostState { &self.state }

}
