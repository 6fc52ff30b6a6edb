//! Routing host events to guest contexts.
//!
//! [`Guest`] is the callback surface a host drives, one method per
//! `proxy_on_*` event, addressed by context id. [`Dispatcher`] implements it
//! for plugins written in Rust against the traits in [`crate::context`];
//! [`WasmGuest`]( crate::WasmGuest ) implements it for compiled modules.

use std::collections::HashMap ;

use crate::context::{ HttpContext, RootContext, TcpContext };
use crate::emulator::HostSession ;
use crate::error::DispatchError ;
use crate::hostcalls::Hostcalls ;
use crate::types::{ Action, PeerType };



/// Guest-side entry points, as a host sees them.
///
/// Each call receives the session the host opened for it; the session's
/// effective context is the context the event is addressed to.
#[allow( clippy::missing_errors_doc )]
pub trait Guest {

	/// A context was created. `parent_context_id` is `0` for a root context.
	fn on_context_create( &mut self, host: &mut HostSession<'_>, context_id: u32, parent_context_id: u32 ) -> Result<(), DispatchError> ;

	fn on_vm_start( &mut self, host: &mut HostSession<'_>, root_context_id: u32, vm_configuration_size: usize ) -> Result<bool, DispatchError> ;
	fn on_configure( &mut self, host: &mut HostSession<'_>, root_context_id: u32, plugin_configuration_size: usize ) -> Result<bool, DispatchError> ;
	fn on_tick( &mut self, host: &mut HostSession<'_>, root_context_id: u32 ) -> Result<(), DispatchError> ;
	fn on_queue_ready( &mut self, host: &mut HostSession<'_>, root_context_id: u32, queue_id: u32 ) -> Result<(), DispatchError> ;
	fn on_done( &mut self, host: &mut HostSession<'_>, root_context_id: u32 ) -> Result<bool, DispatchError> ;

	fn on_request_headers( &mut self, host: &mut HostSession<'_>, context_id: u32, num_headers: usize, end_of_stream: bool ) -> Result<Action, DispatchError> ;
	fn on_request_body( &mut self, host: &mut HostSession<'_>, context_id: u32, body_size: usize, end_of_stream: bool ) -> Result<Action, DispatchError> ;
	fn on_request_trailers( &mut self, host: &mut HostSession<'_>, context_id: u32, num_trailers: usize ) -> Result<Action, DispatchError> ;
	fn on_response_headers( &mut self, host: &mut HostSession<'_>, context_id: u32, num_headers: usize, end_of_stream: bool ) -> Result<Action, DispatchError> ;
	fn on_response_body( &mut self, host: &mut HostSession<'_>, context_id: u32, body_size: usize, end_of_stream: bool ) -> Result<Action, DispatchError> ;
	fn on_response_trailers( &mut self, host: &mut HostSession<'_>, context_id: u32, num_trailers: usize ) -> Result<Action, DispatchError> ;

	fn on_new_connection( &mut self, host: &mut HostSession<'_>, context_id: u32 ) -> Result<Action, DispatchError> ;
	fn on_downstream_data( &mut self, host: &mut HostSession<'_>, context_id: u32, data_size: usize, end_of_stream: bool ) -> Result<Action, DispatchError> ;
	fn on_downstream_connection_close( &mut self, host: &mut HostSession<'_>, context_id: u32, peer: PeerType ) -> Result<(), DispatchError> ;
	fn on_upstream_data( &mut self, host: &mut HostSession<'_>, context_id: u32, data_size: usize, end_of_stream: bool ) -> Result<Action, DispatchError> ;
	fn on_upstream_connection_close( &mut self, host: &mut HostSession<'_>, context_id: u32, peer: PeerType ) -> Result<(), DispatchError> ;

	fn on_http_call_response(
		&mut self,
		host: &mut HostSession<'_>,
		context_id: u32,
		callout_id: u32,
		num_headers: usize,
		body_size: usize,
		num_trailers: usize,
	) -> Result<(), DispatchError> ;

	fn on_log( &mut self, host: &mut HostSession<'_>, context_id: u32 ) -> Result<(), DispatchError> ;
	fn on_delete( &mut self, host: &mut HostSession<'_>, context_id: u32 ) -> Result<(), DispatchError> ;

}

type RootFactory = Box<dyn FnMut( u32 ) -> Box<dyn RootContext>>;

/// Context registry of a native guest.
///
/// Holds a factory for root contexts and every context it has handed out,
/// keyed by id. Stream contexts are asked of the stream's root: TCP first,
/// then HTTP.
pub struct Dispatcher {
	new_root: RootFactory,
	roots: HashMap<u32, Box<dyn RootContext>>,
	http_streams: HashMap<u32, Box<dyn HttpContext>>,
	tcp_streams: HashMap<u32, Box<dyn TcpContext>>,
}

impl std::fmt::Debug for Dispatcher {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Dispatcher" )
			.field( "roots", &self.roots.keys().collect::<Vec<_>>() )
			.field( "http_streams", &self.http_streams.keys().collect::<Vec<_>>() )
			.field( "tcp_streams", &self.tcp_streams.keys().collect::<Vec<_>>() )
			.finish_non_exhaustive()
	}
}

impl Dispatcher {

	/// Dispatches to root contexts built by `new_root`, called once per root id.
	pub fn new<R: RootContext + 'static>( mut new_root: impl FnMut( u32 ) -> R + 'static ) -> Self {
		Self {
			new_root: Box::new( move | context_id | -> Box<dyn RootContext> { Box::new( new_root( context_id )) }),
			roots: HashMap::new(),
			http_streams: HashMap::new(),
			tcp_streams: HashMap::new(),
		}
	}

	/// A plugin that only filters HTTP: every stream gets a context from `new_http`.
	pub fn for_http<H: HttpContext + 'static>( new_http: impl FnMut( u32 ) -> H + Clone + 'static ) -> Self {
		Self::new( move | _ | HttpOnly( new_http.clone() ))
	}

	/// A plugin that only filters TCP: every connection gets a context from `new_tcp`.
	pub fn for_tcp<T: TcpContext + 'static>( new_tcp: impl FnMut( u32 ) -> T + Clone + 'static ) -> Self {
		Self::new( move | _ | TcpOnly( new_tcp.clone() ))
	}

	fn root( &mut self, context_id: u32 ) -> Result<&mut Box<dyn RootContext>, DispatchError> {
		self.roots.get_mut( &context_id ).ok_or( DispatchError::UnknownContext( context_id ))
	}

	fn http( &mut self, context_id: u32 ) -> Result<&mut Box<dyn HttpContext>, DispatchError> {
		self.http_streams.get_mut( &context_id ).ok_or( DispatchError::UnknownContext( context_id ))
	}

	fn tcp( &mut self, context_id: u32 ) -> Result<&mut Box<dyn TcpContext>, DispatchError> {
		self.tcp_streams.get_mut( &context_id ).ok_or( DispatchError::UnknownContext( context_id ))
	}

}

impl Guest for Dispatcher {

	fn on_context_create( &mut self, _host: &mut HostSession<'_>, context_id: u32, parent_context_id: u32 ) -> Result<(), DispatchError> {

		if parent_context_id == 0 {
			let root = ( self.new_root )( context_id );
			self.roots.insert( context_id, root );
			return Ok(())
		}

		let root = self.roots.get_mut( &parent_context_id ).ok_or( DispatchError::UnknownContext( parent_context_id ))?;
		if let Some( tcp ) = root.new_tcp_context( context_id ) {
			self.tcp_streams.insert( context_id, tcp );
		} else if let Some( http ) = root.new_http_context( context_id ) {
			self.http_streams.insert( context_id, http );
		} else {
			tracing::warn!( context_id, parent_context_id, "root context created no stream context" );
		}
		Ok(())

	}

	fn on_vm_start( &mut self, host: &mut HostSession<'_>, root_context_id: u32, vm_configuration_size: usize ) -> Result<bool, DispatchError> {
		Ok( self.root( root_context_id )?.on_vm_start( &mut Hostcalls::new( host ), vm_configuration_size ))
	}

	fn on_configure( &mut self, host: &mut HostSession<'_>, root_context_id: u32, plugin_configuration_size: usize ) -> Result<bool, DispatchError> {
		Ok( self.root( root_context_id )?.on_configure( &mut Hostcalls::new( host ), plugin_configuration_size ))
	}

	fn on_tick( &mut self, host: &mut HostSession<'_>, root_context_id: u32 ) -> Result<(), DispatchError> {
		self.root( root_context_id )?.on_tick( &mut Hostcalls::new( host ));
		Ok(())
	}

	fn on_queue_ready( &mut self, host: &mut HostSession<'_>, root_context_id: u32, queue_id: u32 ) -> Result<(), DispatchError> {
		self.root( root_context_id )?.on_queue_ready( &mut Hostcalls::new( host ), queue_id );
		Ok(())
	}

	fn on_done( &mut self, host: &mut HostSession<'_>, root_context_id: u32 ) -> Result<bool, DispatchError> {
		Ok( self.root( root_context_id )?.on_done( &mut Hostcalls::new( host )))
	}

	fn on_request_headers( &mut self, host: &mut HostSession<'_>, context_id: u32, num_headers: usize, end_of_stream: bool ) -> Result<Action, DispatchError> {
		Ok( self.http( context_id )?.on_http_request_headers( &mut Hostcalls::new( host ), num_headers, end_of_stream ))
	}

	fn on_request_body( &mut self, host: &mut HostSession<'_>, context_id: u32, body_size: usize, end_of_stream: bool ) -> Result<Action, DispatchError> {
		Ok( self.http( context_id )?.on_http_request_body( &mut Hostcalls::new( host ), body_size, end_of_stream ))
	}

	fn on_request_trailers( &mut self, host: &mut HostSession<'_>, context_id: u32, num_trailers: usize ) -> Result<Action, DispatchError> {
		Ok( self.http( context_id )?.on_http_request_trailers( &mut Hostcalls::new( host ), num_trailers ))
	}

	fn on_response_headers( &mut self, host: &mut HostSession<'_>, context_id: u32, num_headers: usize, end_of_stream: bool ) -> Result<Action, DispatchError> {
		Ok( self.http( context_id )?.on_http_response_headers( &mut Hostcalls::new( host ), num_headers, end_of_stream ))
	}

	fn on_response_body( &mut self, host: &mut HostSession<'_>, context_id: u32, body_size: usize, end_of_stream: bool ) -> Result<Action, DispatchError> {
		Ok( self.http( context_id )?.on_http_response_body( &mut Hostcalls::new( host ), body_size, end_of_stream ))
	}

	fn on_response_trailers( &mut self, host: &mut HostSession<'_>, context_id: u32, num_trailers: usize ) -> Result<Action, DispatchError> {
		Ok( self.http( context_id )?.on_http_response_trailers( &mut Hostcalls::new( host ), num_trailers ))
	}

	fn on_new_connection( &mut self, host: &mut HostSession<'_>, context_id: u32 ) -> Result<Action, DispatchError> {
		Ok( self.tcp( context_id )?.on_new_connection( &mut Hostcalls::new( host )))
	}

	fn on_downstream_data( &mut self, host: &mut HostSession<'_>, context_id: u32, data_size: usize, end_of_stream: bool ) -> Result<Action, DispatchError> {
		Ok( self.tcp( context_id )?.on_downstream_data( &mut Hostcalls::new( host ), data_size, end_of_stream ))
	}

	fn on_downstream_connection_close( &mut self, host: &mut HostSession<'_>, context_id: u32, peer: PeerType ) -> Result<(), DispatchError> {
		self.tcp( context_id )?.on_downstream_close( &mut Hostcalls::new( host ), peer );
		Ok(())
	}

	fn on_upstream_data( &mut self, host: &mut HostSession<'_>, context_id: u32, data_size: usize, end_of_stream: bool ) -> Result<Action, DispatchError> {
		Ok( self.tcp( context_id )?.on_upstream_data( &mut Hostcalls::new( host ), data_size, end_of_stream ))
	}

	fn on_upstream_connection_close( &mut self, host: &mut HostSession<'_>, context_id: u32, peer: PeerType ) -> Result<(), DispatchError> {
		self.tcp( context_id )?.on_upstream_close( &mut Hostcalls::new( host ), peer );
		Ok(())
	}

	fn on_http_call_response(
		&mut self,
		host: &mut HostSession<'_>,
		context_id: u32,
		callout_id: u32,
		num_headers: usize,
		body_size: usize,
		num_trailers: usize,
	) -> Result<(), DispatchError> {
		let mut host = Hostcalls::new( host );
		if let Some( http ) = self.http_streams.get_mut( &context_id ) {
			http.on_http_call_response( &mut host, callout_id, num_headers, body_size, num_trailers );
		} else if let Some( tcp ) = self.tcp_streams.get_mut( &context_id ) {
			tcp.on_http_call_response( &mut host, callout_id, num_headers, body_size, num_trailers );
		} else {
			self.root( context_id )?.on_http_call_response( &mut host, callout_id, num_headers, body_size, num_trailers );
		}
		Ok(())
	}

	fn on_log( &mut self, host: &mut HostSession<'_>, context_id: u32 ) -> Result<(), DispatchError> {
		let mut host = Hostcalls::new( host );
		if let Some( http ) = self.http_streams.get_mut( &context_id ) {
			http.on_log( &mut host );
		} else if let Some( tcp ) = self.tcp_streams.get_mut( &context_id ) {
			tcp.on_log( &mut host );
		} else {
			self.root( context_id )?.on_log( &mut host );
		}
		Ok(())
	}

	fn on_delete( &mut self, _host: &mut HostSession<'_>, context_id: u32 ) -> Result<(), DispatchError> {
		let removed = self.http_streams.remove( &context_id ).is_some()
			|| self.tcp_streams.remove( &context_id ).is_some()
			|| self.roots.remove( &context_id ).is_some();
		match removed {
			true => Ok(()),
			false => Err( DispatchError::UnknownContext( context_id )),
		}
	}

}

/// Root context of [`Dispatcher::for_http`].
struct HttpOnly<F>( F );

impl<F> crate::context::Context for HttpOnly<F> {}

impl<H, F> RootContext for HttpOnly<F>
where
	H: HttpContext + 'static,
	F: FnMut( u32 ) -> H,
{
	fn new_http_context( &mut self, context_id: u32 ) -> Option<Box<dyn HttpContext>> {
		Some( Box::new(( self.0 )( context_id )))
	}
}

/// Root context of [`Dispatcher::for_tcp`].
struct TcpOnly<F>( F );

impl<F> crate::context::Context for TcpOnly<F> {}

impl<T, F> RootContext for TcpOnly<F>
where
	T: TcpContext + 'static,
	F: FnMut( u32 ) -> T,
{
	fn new_tcp_context( &mut self, context_id: u32 ) -> Option<Box<dyn TcpContext>> {
		Some( Box::new(( self.0 )( context_id )))
	}
}
