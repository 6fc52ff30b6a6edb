//! Running a compiled plugin under wasmtime.
//!
//! [`WasmGuest`] instantiates a core wasm module built against the Proxy-Wasm
//! ABI, links every `env.proxy_*` import to the host session of the callback
//! in flight and drives the module's `proxy_on_*` exports. The emulator does
//! not know the difference: a compiled plugin and a [`Dispatcher`]( crate::Dispatcher )
//! are interchangeable behind [`Guest`].

use std::mem ;

use wasmtime::{ Caller, Engine, Instance, Linker, Module, Store, WasmParams, WasmResults };

use crate::dispatcher::Guest ;
use crate::emulator::{ HostSession, HostState };
use crate::error::{ DispatchError, HostError, HostResult };
use crate::host::{ HostBytes, ProxyHost };
use crate::memory::{ address, return_bytes, GuestMemory };
use crate::types::{ Action, BufferType, LogLevel, MapType, MetricType, PeerType, Status, StreamType };



/// Store data: the host state on loan for the current callback.
#[derive( Debug, Default )]
struct GuestData {
	state: HostState,
	effective: u32,
}

/// A compiled Proxy-Wasm plugin, ready to be driven by a
/// [`HostEmulator`]( crate::HostEmulator ).
///
/// ```
/// use proxy_wasm_link::{ Engine, HostEmulator, Module, WasmGuest };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = Engine::default();
/// let module = Module::new( &engine, r#"(module
/// 	(memory (export "memory") 1)
/// 	(func (export "proxy_on_context_create") (param i32 i32))
/// )"# )?;
/// let mut host = HostEmulator::new( WasmGuest::new( &engine, &module )? );
/// assert!( host.start_plugin()? );
/// # Ok(())
/// # }
/// ```
pub struct WasmGuest {
	store: Store<GuestData>,
	instance: Instance,
	fuel_per_callback: Option<u64>,
}

impl std::fmt::Debug for WasmGuest {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "WasmGuest" )
			.field( "store", &self.store )
			.field( "fuel_per_callback", &self.fuel_per_callback )
			.finish_non_exhaustive()
	}
}

impl WasmGuest {

	/// Links and instantiates `module`, then runs its `_initialize` (or
	/// `_start`) export if it has one. Initialisation is not fuel-limited.
	///
	/// Imports outside the Proxy-Wasm ABI are linked to functions that trap
	/// when called.
	///
	/// # Errors
	/// When linking, instantiation or initialisation fails.
	pub fn new( engine: &Engine, module: &Module ) -> Result<Self, wasmtime::Error> {

		let mut linker = Linker::new( engine );
		link_host_calls( &mut linker )?;
		linker.define_unknown_imports_as_traps( module )?;

		let mut store = Store::new( engine, GuestData::default() );
		let fuel_enabled = store.set_fuel( u64::MAX ).is_ok();
		let instance = linker.instantiate( &mut store, module )?;

		let initialize = [ "_initialize", "_start" ].into_iter()
			.find_map(| name | instance.get_func( &mut store, name ));
		if let Some( initialize ) = initialize {
			initialize.typed::<(), ()>( &store )?.call( &mut store, () )?;
		}
		if instance.get_export( &mut store, "proxy_abi_version_0_2_1" ).is_none() {
			tracing::warn!( "module does not export proxy_abi_version_0_2_1" );
		}
		if fuel_enabled { store.set_fuel( u64::MAX )?; }

		Ok( Self { store, instance, fuel_per_callback: None })

	}

	/// Gives every callback a fresh budget of `fuel`. The engine must be
	/// configured with `consume_fuel`; running dry traps the callback, which
	/// surfaces as [`DispatchError::RuntimeException`].
	pub fn with_fuel_per_callback( mut self, fuel: u64 ) -> Self {
		self.fuel_per_callback = Some( fuel );
		self
	}

	fn call<P, R>( &mut self, host: &mut HostSession<'_>, name: &'static str, params: P ) -> Result<Option<R>, DispatchError>
	where
		P: WasmParams,
		R: WasmResults,
	{

		let Some( func ) = self.instance.get_func( &mut self.store, name ) else {
			tracing::trace!( name, "guest does not export callback" );
			return Ok( None )
		};
		let func = func.typed::<P, R>( &self.store ).map_err( DispatchError::RuntimeException )?;

		let fuel_was_set = match self.fuel_per_callback {
			Some( fuel ) => { self.store.set_fuel( fuel ).map_err( DispatchError::RuntimeException )?; true }
			None => false,
		};

		mem::swap( host.state, &mut self.store.data_mut().state );
		self.store.data_mut().effective = host.effective ;

		let call_result = func.call( &mut self.store, params );

		// Unspent fuel does not carry over.
		if fuel_was_set { let _ = self.store.set_fuel( 0 ); }

		mem::swap( host.state, &mut self.store.data_mut().state );
		host.effective = self.store.data().effective ;

		call_result.map( Some ).map_err( DispatchError::RuntimeException )

	}

}

#[inline] fn raw( value: u32 ) -> i32 { i32::from_ne_bytes( value.to_ne_bytes() ) }
#[inline] fn unsigned( value: i32 ) -> u32 { u32::from_ne_bytes( value.to_ne_bytes() ) }

fn size( value: usize ) -> Result<i32, DispatchError> {
	i32::try_from( value ).map_err(|_| DispatchError::Host( HostError::BadArgument ))
}

fn action( name: &'static str, returned: Option<i32> ) -> Result<Action, DispatchError> {
	match returned {
		None => Ok( Action::Continue ),
		Some( value ) => Action::from_raw( unsigned( value )).map_err(|_| DispatchError::InvalidReturn( name, value )),
	}
}

impl Guest for WasmGuest {

	fn on_context_create( &mut self, host: &mut HostSession<'_>, context_id: u32, parent_context_id: u32 ) -> Result<(), DispatchError> {
		self.call::<( i32, i32 ), ()>( host, "proxy_on_context_create", ( raw( context_id ), raw( parent_context_id )))?
			.ok_or( DispatchError::MissingExport( "proxy_on_context_create".to_string() ))
	}

	fn on_vm_start( &mut self, host: &mut HostSession<'_>, root_context_id: u32, vm_configuration_size: usize ) -> Result<bool, DispatchError> {
		let params = ( raw( root_context_id ), size( vm_configuration_size )? );
		Ok( self.call::<_, i32>( host, "proxy_on_vm_start", params )?.is_none_or(| started | started != 0 ))
	}

	fn on_configure( &mut self, host: &mut HostSession<'_>, root_context_id: u32, plugin_configuration_size: usize ) -> Result<bool, DispatchError> {
		let params = ( raw( root_context_id ), size( plugin_configuration_size )? );
		Ok( self.call::<_, i32>( host, "proxy_on_configure", params )?.is_none_or(| configured | configured != 0 ))
	}

	fn on_tick( &mut self, host: &mut HostSession<'_>, root_context_id: u32 ) -> Result<(), DispatchError> {
		self.call::<i32, ()>( host, "proxy_on_tick", raw( root_context_id ))?;
		Ok(())
	}

	fn on_queue_ready( &mut self, host: &mut HostSession<'_>, root_context_id: u32, queue_id: u32 ) -> Result<(), DispatchError> {
		self.call::<( i32, i32 ), ()>( host, "proxy_on_queue_ready", ( raw( root_context_id ), raw( queue_id )))?;
		Ok(())
	}

	fn on_done( &mut self, host: &mut HostSession<'_>, root_context_id: u32 ) -> Result<bool, DispatchError> {
		Ok( self.call::<i32, i32>( host, "proxy_on_done", raw( root_context_id ))?.is_none_or(| done | done != 0 ))
	}

	fn on_request_headers( &mut self, host: &mut HostSession<'_>, context_id: u32, num_headers: usize, end_of_stream: bool ) -> Result<Action, DispatchError> {
		const NAME: &str = "proxy_on_request_headers" ;
		let params = ( raw( context_id ), size( num_headers )?, i32::from( end_of_stream ));
		action( NAME, self.call::<_, i32>( host, NAME, params )? )
	}

	fn on_request_body( &mut self, host: &mut HostSession<'_>, context_id: u32, body_size: usize, end_of_stream: bool ) -> Result<Action, DispatchError> {
		const NAME: &str = "proxy_on_request_body" ;
		let params = ( raw( context_id ), size( body_size )?, i32::from( end_of_stream ));
		action( NAME, self.call::<_, i32>( host, NAME, params )? )
	}

	fn on_request_trailers( &mut self, host: &mut HostSession<'_>, context_id: u32, num_trailers: usize ) -> Result<Action, DispatchError> {
		const NAME: &str = "proxy_on_request_trailers" ;
		let params = ( raw( context_id ), size( num_trailers )? );
		action( NAME, self.call::<_, i32>( host, NAME, params )? )
	}

	fn on_response_headers( &mut self, host: &mut HostSession<'_>, context_id: u32, num_headers: usize, end_of_stream: bool ) -> Result<Action, DispatchError> {
		const NAME: &str = "proxy_on_response_headers" ;
		let params = ( raw( context_id ), size( num_headers )?, i32::from( end_of_stream ));
		action( NAME, self.call::<_, i32>( host, NAME, params )? )
	}

	fn on_response_body( &mut self, host: &mut HostSession<'_>, context_id: u32, body_size: usize, end_of_stream: bool ) -> Result<Action, DispatchError> {
		const NAME: &str = "proxy_on_response_body" ;
		let params = ( raw( context_id ), size( body_size )?, i32::from( end_of_stream ));
		action( NAME, self.call::<_, i32>( host, NAME, params )? )
	}

	fn on_response_trailers( &mut self, host: &mut HostSession<'_>, context_id: u32, num_trailers: usize ) -> Result<Action, DispatchError> {
		const NAME: &str = "proxy_on_response_trailers" ;
		let params = ( raw( context_id ), size( num_trailers )? );
		action( NAME, self.call::<_, i32>( host, NAME, params )? )
	}

	fn on_new_connection( &mut self, host: &mut HostSession<'_>, context_id: u32 ) -> Result<Action, DispatchError> {
		const NAME: &str = "proxy_on_new_connection" ;
		action( NAME, self.call::<i32, i32>( host, NAME, raw( context_id ))? )
	}

	fn on_downstream_data( &mut self, host: &mut HostSession<'_>, context_id: u32, data_size: usize, end_of_stream: bool ) -> Result<Action, DispatchError> {
		const NAME: &str = "proxy_on_downstream_data" ;
		let params = ( raw( context_id ), size( data_size )?, i32::from( end_of_stream ));
		action( NAME, self.call::<_, i32>( host, NAME, params )? )
	}

	fn on_downstream_connection_close( &mut self, host: &mut HostSession<'_>, context_id: u32, peer: PeerType ) -> Result<(), DispatchError> {
		let params = ( raw( context_id ), raw( peer.as_raw() ));
		self.call::<( i32, i32 ), ()>( host, "proxy_on_downstream_connection_close", params )?;
		Ok(())
	}

	fn on_upstream_data( &mut self, host: &mut HostSession<'_>, context_id: u32, data_size: usize, end_of_stream: bool ) -> Result<Action, DispatchError> {
		const NAME: &str = "proxy_on_upstream_data" ;
		let params = ( raw( context_id ), size( data_size )?, i32::from( end_of_stream ));
		action( NAME, self.call::<_, i32>( host, NAME, params )? )
	}

	fn on_upstream_connection_close( &mut self, host: &mut HostSession<'_>, context_id: u32, peer: PeerType ) -> Result<(), DispatchError> {
		let params = ( raw( context_id ), raw( peer.as_raw() ));
		self.call::<( i32, i32 ), ()>( host, "proxy_on_upstream_connection_close", params )?;
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
		let params = ( raw( context_id ), raw( callout_id ), size( num_headers )?, size( body_size )?, size( num_trailers )? );
		self.call::<( i32, i32, i32, i32, i32 ), ()>( host, "proxy_on_http_call_response", params )?;
		Ok(())
	}

	fn on_log( &mut self, host: &mut HostSession<'_>, context_id: u32 ) -> Result<(), DispatchError> {
		self.call::<i32, ()>( host, "proxy_on_log", raw( context_id ))?;
		Ok(())
	}

	fn on_delete( &mut self, host: &mut HostSession<'_>, context_id: u32 ) -> Result<(), DispatchError> {
		self.call::<i32, ()>( host, "proxy_on_delete", raw( context_id ))?;
		Ok(())
	}

}

fn status( result: HostResult<()> ) -> i32 { raw( Status::from( &result ).as_raw() ) }

/// Opens a session on the loaned host state for the duration of one host call.
fn session<R>(
	caller: &mut Caller<'_, GuestData>,
	call: impl FnOnce( &mut HostSession<'_> ) -> HostResult<R>,
) -> HostResult<R> {
	let data = caller.data_mut();
	let mut host = HostSession::new( &mut data.state, data.effective );
	let result = call( &mut host );
	let effective = host.effective_context();
	data.effective = effective ;
	result
}

/// Runs a host call that touches guest memory and reports its status.
fn host_call(
	caller: &mut Caller<'_, GuestData>,
	call: impl FnOnce( &mut Caller<'_, GuestData>, GuestMemory ) -> HostResult<()>,
) -> i32 {
	status( GuestMemory::of( caller ).and_then(| memory | call( caller, memory )))
}

#[allow( clippy::too_many_lines )]
fn link_host_calls( linker: &mut Linker<GuestData> ) -> Result<(), wasmtime::Error> {

	linker.func_wrap( "env", "proxy_log", | mut caller: Caller<'_, GuestData>, level: i32, message_ptr: i32, message_size: i32 | {
		host_call( &mut caller, | caller, memory | {
			let level = LogLevel::from_raw( unsigned( level ))?;
			let message = memory.read( &*caller, message_ptr, message_size )?;
			session( caller, | host | host.log( level, &message ))
		})
	})?;

	// Every level is recorded, so the guest is told to log everything.
	linker.func_wrap( "env", "proxy_get_log_level", | mut caller: Caller<'_, GuestData>, return_level_ptr: i32 | {
		host_call( &mut caller, | caller, memory | memory.write_u32( caller, return_level_ptr, LogLevel::Trace.as_raw() ))
	})?;

	linker.func_wrap( "env", "proxy_get_property", | mut caller: Caller<'_, GuestData>, path_ptr: i32, path_size: i32, return_value_ptr: i32, return_value_size: i32 | {
		host_call( &mut caller, | caller, memory | {
			let path = memory.read( &*caller, path_ptr, path_size )?;
			let value = session( caller, | host | host.get_property( &path ).map( HostBytes::into_vec ))?;
			return_bytes( caller, memory, &value, return_value_ptr, return_value_size )
		})
	})?;

	linker.func_wrap( "env", "proxy_set_property", | mut caller: Caller<'_, GuestData>, path_ptr: i32, path_size: i32, value_ptr: i32, value_size: i32 | {
		host_call( &mut caller, | caller, memory | {
			let path = memory.read( &*caller, path_ptr, path_size )?;
			let value = memory.read( &*caller, value_ptr, value_size )?;
			session( caller, | host | host.set_property( &path, &value ))
		})
	})?;

	linker.func_wrap( "env", "proxy_send_local_response", | mut caller: Caller<'_, GuestData>,
		status_code: i32,
		status_code_detail_ptr: i32, status_code_detail_size: i32,
		body_ptr: i32, body_size: i32,
		headers_ptr: i32, headers_size: i32,
		grpc_status: i32,
	| {
		host_call( &mut caller, | caller, memory | {
			let detail = memory.read( &*caller, status_code_detail_ptr, status_code_detail_size )?;
			let body = memory.read( &*caller, body_ptr, body_size )?;
			let headers = memory.read( &*caller, headers_ptr, headers_size )?;
			session( caller, | host | host.send_local_response( unsigned( status_code ), &detail, &body, &headers, grpc_status ))
		})
	})?;

	linker.func_wrap( "env", "proxy_get_shared_data", | mut caller: Caller<'_, GuestData>,
		key_ptr: i32, key_size: i32,
		return_value_ptr: i32, return_value_size: i32,
		return_cas_ptr: i32,
	| {
		host_call( &mut caller, | caller, memory | {
			let key = memory.read( &*caller, key_ptr, key_size )?;
			let ( value, cas ) = session( caller, | host | host.get_shared_data( &key ).map(|( value, cas )| ( value.into_vec(), cas )))?;
			return_bytes( caller, memory, &value, return_value_ptr, return_value_size )?;
			memory.write_u32( caller, return_cas_ptr, cas )
		})
	})?;

	linker.func_wrap( "env", "proxy_set_shared_data", | mut caller: Caller<'_, GuestData>, key_ptr: i32, key_size: i32, value_ptr: i32, value_size: i32, cas: i32 | {
		host_call( &mut caller, | caller, memory | {
			let key = memory.read( &*caller, key_ptr, key_size )?;
			let value = memory.read( &*caller, value_ptr, value_size )?;
			session( caller, | host | host.set_shared_data( &key, &value, unsigned( cas )))
		})
	})?;

	linker.func_wrap( "env", "proxy_register_shared_queue", | mut caller: Caller<'_, GuestData>, name_ptr: i32, name_size: i32, return_id_ptr: i32 | {
		host_call( &mut caller, | caller, memory | {
			let name = memory.read( &*caller, name_ptr, name_size )?;
			let queue_id = session( caller, | host | host.register_shared_queue( &name ))?;
			memory.write_u32( caller, return_id_ptr, queue_id )
		})
	})?;

	linker.func_wrap( "env", "proxy_resolve_shared_queue", | mut caller: Caller<'_, GuestData>, vm_id_ptr: i32, vm_id_size: i32, name_ptr: i32, name_size: i32, return_id_ptr: i32 | {
		host_call( &mut caller, | caller, memory | {
			let vm_id = memory.read( &*caller, vm_id_ptr, vm_id_size )?;
			let name = memory.read( &*caller, name_ptr, name_size )?;
			let queue_id = session( caller, | host | host.resolve_shared_queue( &vm_id, &name ))?;
			memory.write_u32( caller, return_id_ptr, queue_id )
		})
	})?;

	linker.func_wrap( "env", "proxy_dequeue_shared_queue", | mut caller: Caller<'_, GuestData>, queue_id: i32, return_value_ptr: i32, return_value_size: i32 | {
		host_call( &mut caller, | caller, memory | {
			let value = session( caller, | host | host.dequeue_shared_queue( unsigned( queue_id )).map( HostBytes::into_vec ))?;
			return_bytes( caller, memory, &value, return_value_ptr, return_value_size )
		})
	})?;

	linker.func_wrap( "env", "proxy_enqueue_shared_queue", | mut caller: Caller<'_, GuestData>, queue_id: i32, value_ptr: i32, value_size: i32 | {
		host_call( &mut caller, | caller, memory | {
			let value = memory.read( &*caller, value_ptr, value_size )?;
			session( caller, | host | host.enqueue_shared_queue( unsigned( queue_id ), &value ))
		})
	})?;

	linker.func_wrap( "env", "proxy_get_header_map_value", | mut caller: Caller<'_, GuestData>,
		map_type: i32,
		key_ptr: i32, key_size: i32,
		return_value_ptr: i32, return_value_size: i32,
	| {
		host_call( &mut caller, | caller, memory | {
			let map = MapType::from_raw( unsigned( map_type ))?;
			let key = memory.read( &*caller, key_ptr, key_size )?;
			let value = session( caller, | host | host.get_header_map_value( map, &key ).map( HostBytes::into_vec ))?;
			return_bytes( caller, memory, &value, return_value_ptr, return_value_size )
		})
	})?;

	linker.func_wrap( "env", "proxy_add_header_map_value", | mut caller: Caller<'_, GuestData>, map_type: i32, key_ptr: i32, key_size: i32, value_ptr: i32, value_size: i32 | {
		host_call( &mut caller, | caller, memory | {
			let map = MapType::from_raw( unsigned( map_type ))?;
			let key = memory.read( &*caller, key_ptr, key_size )?;
			let value = memory.read( &*caller, value_ptr, value_size )?;
			session( caller, | host | host.add_header_map_value( map, &key, &value ))
		})
	})?;

	linker.func_wrap( "env", "proxy_replace_header_map_value", | mut caller: Caller<'_, GuestData>, map_type: i32, key_ptr: i32, key_size: i32, value_ptr: i32, value_size: i32 | {
		host_call( &mut caller, | caller, memory | {
			let map = MapType::from_raw( unsigned( map_type ))?;
			let key = memory.read( &*caller, key_ptr, key_size )?;
			let value = memory.read( &*caller, value_ptr, value_size )?;
			session( caller, | host | host.replace_header_map_value( map, &key, &value ))
		})
	})?;

	linker.func_wrap( "env", "proxy_remove_header_map_value", | mut caller: Caller<'_, GuestData>, map_type: i32, key_ptr: i32, key_size: i32 | {
		host_call( &mut caller, | caller, memory | {
			let map = MapType::from_raw( unsigned( map_type ))?;
			let key = memory.read( &*caller, key_ptr, key_size )?;
			session( caller, | host | host.remove_header_map_value( map, &key ))
		})
	})?;

	linker.func_wrap( "env", "proxy_get_header_map_pairs", | mut caller: Caller<'_, GuestData>, map_type: i32, return_map_ptr: i32, return_map_size: i32 | {
		host_call( &mut caller, | caller, memory | {
			let map = MapType::from_raw( unsigned( map_type ))?;
			let pairs = session( caller, | host | host.get_header_map_pairs( map ).map( HostBytes::into_vec ))?;
			return_bytes( caller, memory, &pairs, return_map_ptr, return_map_size )
		})
	})?;

	linker.func_wrap( "env", "proxy_set_header_map_pairs", | mut caller: Caller<'_, GuestData>, map_type: i32, map_ptr: i32, map_size: i32 | {
		host_call( &mut caller, | caller, memory | {
			let map = MapType::from_raw( unsigned( map_type ))?;
			let pairs = memory.read( &*caller, map_ptr, map_size )?;
			session( caller, | host | host.set_header_map_pairs( map, &pairs ))
		})
	})?;

	linker.func_wrap( "env", "proxy_get_buffer_bytes", | mut caller: Caller<'_, GuestData>,
		buffer_type: i32,
		start: i32, max_size: i32,
		return_buffer_ptr: i32, return_buffer_size: i32,
	| {
		host_call( &mut caller, | caller, memory | {
			let buffer = BufferType::from_raw( unsigned( buffer_type ))?;
			let bytes = session( caller, | host | host.get_buffer_bytes( buffer, address( start ), address( max_size )).map( HostBytes::into_vec ))?;
			return_bytes( caller, memory, &bytes, return_buffer_ptr, return_buffer_size )
		})
	})?;

	linker.func_wrap( "env", "proxy_set_buffer_bytes", | mut caller: Caller<'_, GuestData>, buffer_type: i32, start: i32, max_size: i32, buffer_ptr: i32, buffer_size: i32 | {
		host_call( &mut caller, | caller, memory | {
			let buffer = BufferType::from_raw( unsigned( buffer_type ))?;
			let data = memory.read( &*caller, buffer_ptr, buffer_size )?;
			session( caller, | host | host.set_buffer_bytes( buffer, address( start ), address( max_size ), &data ))
		})
	})?;

	linker.func_wrap( "env", "proxy_continue_stream", | mut caller: Caller<'_, GuestData>, stream_type: i32 | {
		status( StreamType::from_raw( unsigned( stream_type )).and_then(| stream | session( &mut caller, | host | host.continue_stream( stream ))))
	})?;

	linker.func_wrap( "env", "proxy_close_stream", | mut caller: Caller<'_, GuestData>, stream_type: i32 | {
		status( StreamType::from_raw( unsigned( stream_type )).and_then(| stream | session( &mut caller, | host | host.close_stream( stream ))))
	})?;

	linker.func_wrap( "env", "proxy_http_call", | mut caller: Caller<'_, GuestData>,
		upstream_ptr: i32, upstream_size: i32,
		headers_ptr: i32, headers_size: i32,
		body_ptr: i32, body_size: i32,
		trailers_ptr: i32, trailers_size: i32,
		timeout_milliseconds: i32,
		return_callout_id_ptr: i32,
	| {
		host_call( &mut caller, | caller, memory | {
			let upstream = memory.read( &*caller, upstream_ptr, upstream_size )?;
			let headers = memory.read( &*caller, headers_ptr, headers_size )?;
			let body = memory.read( &*caller, body_ptr, body_size )?;
			let trailers = memory.read( &*caller, trailers_ptr, trailers_size )?;
			let callout_id = session( caller, | host | host.http_call( &upstream, &headers, &body, &trailers, unsigned( timeout_milliseconds )))?;
			memory.write_u32( caller, return_callout_id_ptr, callout_id )
		})
	})?;

	linker.func_wrap( "env", "proxy_call_foreign_function", | mut caller: Caller<'_, GuestData>,
		name_ptr: i32, name_size: i32,
		params_ptr: i32, params_size: i32,
		return_results_ptr: i32, return_results_size: i32,
	| {
		host_call( &mut caller, | caller, memory | {
			let name = memory.read( &*caller, name_ptr, name_size )?;
			let params = memory.read( &*caller, params_ptr, params_size )?;
			let results = session( caller, | host | host.call_foreign_function( &name, &params ).map( HostBytes::into_vec ))?;
			return_bytes( caller, memory, &results, return_results_ptr, return_results_size )
		})
	})?;

	linker.func_wrap( "env", "proxy_set_tick_period_milliseconds", | mut caller: Caller<'_, GuestData>, period: i32 | {
		status( session( &mut caller, | host | host.set_tick_period_milliseconds( unsigned( period ))))
	})?;

	linker.func_wrap( "env", "proxy_set_effective_context", | mut caller: Caller<'_, GuestData>, context_id: i32 | {
		status( session( &mut caller, | host | host.set_effective_context( unsigned( context_id ))))
	})?;

	linker.func_wrap( "env", "proxy_done", | mut caller: Caller<'_, GuestData> | {
		status( session( &mut caller, | host | host.done() ))
	})?;

	linker.func_wrap( "env", "proxy_define_metric", | mut caller: Caller<'_, GuestData>, metric_type: i32, name_ptr: i32, name_size: i32, return_metric_id_ptr: i32 | {
		host_call( &mut caller, | caller, memory | {
			let metric_type = MetricType::from_raw( unsigned( metric_type ))?;
			let name = memory.read( &*caller, name_ptr, name_size )?;
			let metric_id = session( caller, | host | host.define_metric( metric_type, &name ))?;
			memory.write_u32( caller, return_metric_id_ptr, metric_id )
		})
	})?;

	linker.func_wrap( "env", "proxy_increment_metric", | mut caller: Caller<'_, GuestData>, metric_id: i32, offset: i64 | {
		status( session( &mut caller, | host | host.increment_metric( unsigned( metric_id ), offset )))
	})?;

	linker.func_wrap( "env", "proxy_record_metric", | mut caller: Caller<'_, GuestData>, metric_id: i32, value: i64 | {
		let value = u64::from_ne_bytes( value.to_ne_bytes() );
		status( session( &mut caller, | host | host.record_metric( unsigned( metric_id ), value )))
	})?;

	linker.func_wrap( "env", "proxy_get_metric", | mut caller: Caller<'_, GuestData>, metric_id: i32, return_value_ptr: i32 | {
		host_call( &mut caller, | caller, memory | {
			let value = session( caller, | host | host.get_metric( unsigned( metric_id )))?;
			memory.write_u64( caller, return_value_ptr, value )
		})
	})?;

	Ok(())

}
