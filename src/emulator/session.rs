use std::time::Duration ;

use crate::error::{ HostError, HostResult };
use crate::header_map::HeaderMap ;
use crate::host::{ HostBytes, ProxyHost };
use crate::marshal::PropertyPath ;
use crate::stream::{ read_window, LocalResponse, StreamState };
use crate::types::{ BufferType, LogLevel, MapType, MetricType, StreamType };
use super::state::{ HostState, HttpCalloutAttributes, Metric, SharedEntry, SharedQueue };



/// The host as one guest callback sees it.
///
/// A session is opened for every dispatch with the dispatching context as its
/// effective context. Stream-scoped calls act on the effective context;
/// [`set_effective_context`]( ProxyHost::set_effective_context ) moves it for
/// the rest of the callback and nothing else.
#[derive( Debug )]
pub struct HostSession<'a> {
	pub(crate) state: &'a mut HostState,
	pub(crate) effective: u32,
}

impl<'a> HostSession<'a> {

	pub fn new( state: &'a mut HostState, effective: u32 ) -> Self { Self { state, effective }}

	/// The context stream-scoped calls currently act on.
	#[inline] pub fn effective_context( &self ) -> u32 { self.effective }

	fn stream( &mut self ) -> HostResult<&mut StreamState> {
		let context_id = self.effective ;
		match self.state.streams.get_mut( &context_id ) {
			Some( stream ) if !stream.is_deleted() => Ok( stream ),
			_ => {
				tracing::debug!( context_id, "stream call outside a live stream context" );
				Err( HostError::BadArgument )
			}
		}
	}

}

fn utf8( bytes: &[u8] ) -> HostResult<&str> {
	std::str::from_utf8( bytes ).map_err(|_| HostError::BadArgument )
}

impl ProxyHost for HostSession<'_> {

	fn log( &mut self, level: LogLevel, message: &[u8] ) -> HostResult<()> {
		let message = String::from_utf8_lossy( message ).into_owned();
		let context_id = self.effective ;
		match level {
			LogLevel::Trace => tracing::trace!( target: "proxy_wasm::guest", context_id, "{message}" ),
			LogLevel::Debug => tracing::debug!( target: "proxy_wasm::guest", context_id, "{message}" ),
			LogLevel::Info => tracing::info!( target: "proxy_wasm::guest", context_id, "{message}" ),
			LogLevel::Warn => tracing::warn!( target: "proxy_wasm::guest", context_id, "{message}" ),
			LogLevel::Error | LogLevel::Critical => tracing::error!( target: "proxy_wasm::guest", context_id, ?level, "{message}" ),
		}
		self.state.record_log( level, message );
		Ok(())
	}

	fn get_property( &mut self, path: &[u8] ) -> HostResult<HostBytes<'_>> {
		PropertyPath::decode( path )?;
		self.state.properties.get( path )
			.map(| value | HostBytes::borrowed( value ))
			.ok_or( HostError::NotFound )
	}

	fn set_property( &mut self, path: &[u8], value: &[u8] ) -> HostResult<()> {
		PropertyPath::decode( path )?;
		self.state.properties.insert( path.to_vec(), value.to_vec() );
		Ok(())
	}

	fn send_local_response(
		&mut self,
		status_code: u32,
		status_code_detail: &[u8],
		body: &[u8],
		headers: &[u8],
		grpc_status: i32,
	) -> HostResult<()> {
		let response = LocalResponse {
			status_code,
			status_code_detail: String::from_utf8_lossy( status_code_detail ).into_owned(),
			body: body.to_vec(),
			headers: HeaderMap::decode( headers )?,
			grpc_status: ( grpc_status >= 0 ).then_some( grpc_status ),
		};
		self.stream()?.send_local_response( response );
		Ok(())
	}

	fn get_shared_data( &mut self, key: &[u8] ) -> HostResult<( HostBytes<'_>, u32 )> {
		self.state.shared_data.get( key )
			.map(| entry | ( HostBytes::borrowed( &entry.value ), entry.cas ))
			.ok_or( HostError::NotFound )
	}

	fn set_shared_data( &mut self, key: &[u8], value: &[u8], cas: u32 ) -> HostResult<()> {
		if let Some( entry ) = self.state.shared_data.get( key ) {
			if entry.cas != cas {
				tracing::debug!( key = %String::from_utf8_lossy( key ), stored = entry.cas, cas, "shared data cas mismatch" );
				return Err( HostError::CasMismatch )
			}
		}
		// A key whose cas reached u32::MAX is frozen rather than wrapped.
		let next = cas.checked_add( 1 ).ok_or_else(|| {
			tracing::debug!( key = %String::from_utf8_lossy( key ), cas, "shared data cas exhausted" );
			HostError::BadArgument
		})?;
		let entry = SharedEntry { value: value.to_vec(), cas: next };
		self.state.shared_data.insert( key.to_vec(), entry );
		Ok(())
	}

	fn register_shared_queue( &mut self, name: &[u8] ) -> HostResult<u32> {
		let name = utf8( name )?;
		if let Some( queue_id ) = self.state.queue_id( &self.state.vm_id, name ) { return Ok( queue_id ) }
		self.state.queues.push( SharedQueue {
			vm_id: self.state.vm_id.clone(),
			name: name.to_string(),
			items: Default::default(),
		});
		self.state.queue_id( &self.state.vm_id, name ).ok_or( HostError::InternalFailure )
	}

	fn resolve_shared_queue( &mut self, vm_id: &[u8], name: &[u8] ) -> HostResult<u32> {
		self.state.queue_id( utf8( vm_id )?, utf8( name )? ).ok_or( HostError::NotFound )
	}

	fn dequeue_shared_queue( &mut self, queue_id: u32 ) -> HostResult<HostBytes<'_>> {
		self.state.queue_mut( queue_id )?
			.items.pop_front()
			.map( HostBytes::owned )
			.ok_or( HostError::Empty )
	}

	fn enqueue_shared_queue( &mut self, queue_id: u32, value: &[u8] ) -> HostResult<()> {
		self.state.queue_mut( queue_id )?.items.push_back( value.to_vec() );
		Ok(())
	}

	fn get_header_map_value( &mut self, map: MapType, key: &[u8] ) -> HostResult<HostBytes<'_>> {
		let key = utf8( key )?;
		let headers = match map {
			MapType::HttpCallResponseHeaders | MapType::HttpCallResponseTrailers => self.callout_map( map )?,
			_ => self.stream()?.map( map )?,
		};
		headers.get( key )
			.map(| value | HostBytes::borrowed( value.as_bytes() ))
			.ok_or( HostError::NotFound )
	}

	fn add_header_map_value( &mut self, map: MapType, key: &[u8], value: &[u8] ) -> HostResult<()> {
		let ( key, value ) = ( utf8( key )?, utf8( value )? );
		self.stream()?.map_mut( map )?.add( key, value );
		Ok(())
	}

	fn replace_header_map_value( &mut self, map: MapType, key: &[u8], value: &[u8] ) -> HostResult<()> {
		let ( key, value ) = ( utf8( key )?, utf8( value )? );
		self.stream()?.map_mut( map )?.replace( key, value );
		Ok(())
	}

	fn remove_header_map_value( &mut self, map: MapType, key: &[u8] ) -> HostResult<()> {
		let key = utf8( key )?;
		self.stream()?.map_mut( map )?.remove( key );
		Ok(())
	}

	fn get_header_map_pairs( &mut self, map: MapType ) -> HostResult<HostBytes<'_>> {
		let headers = match map {
			MapType::HttpCallResponseHeaders | MapType::HttpCallResponseTrailers => self.callout_map( map )?,
			_ => self.stream()?.map( map )?,
		};
		Ok( HostBytes::owned( headers.encode() ))
	}

	fn set_header_map_pairs( &mut self, map: MapType, pairs: &[u8] ) -> HostResult<()> {
		let headers = HeaderMap::decode( pairs )?;
		*self.stream()?.map_mut( map )? = headers ;
		Ok(())
	}

	fn get_buffer_bytes( &mut self, buffer: BufferType, start: usize, max_size: usize ) -> HostResult<HostBytes<'_>> {
		let bytes = match buffer {
			BufferType::VmConfiguration => read_window( &self.state.vm_configuration, start, max_size )?,
			BufferType::PluginConfiguration => read_window( &self.state.plugin_configuration, start, max_size )?,
			BufferType::HttpCallResponseBody => match &self.state.callout_response {
				Some( response ) => read_window( &response.body, start, max_size )?,
				None => return Err( HostError::NotFound ),
			},
			_ => self.stream()?.buffer( buffer )?.read( start, max_size )?,
		};
		Ok( HostBytes::borrowed( bytes ))
	}

	fn set_buffer_bytes( &mut self, buffer: BufferType, start: usize, max_size: usize, data: &[u8] ) -> HostResult<()> {
		match buffer {
			BufferType::VmConfiguration
			| BufferType::PluginConfiguration
			| BufferType::HttpCallResponseBody => Err( HostError::Unimplemented ),
			_ => self.stream()?.buffer_mut( buffer )?.write( start, max_size, data ).inspect_err(|_| {
				tracing::debug!( ?buffer, start, max_size, "rejected buffer write" );
			}),
		}
	}

	fn continue_stream( &mut self, stream: StreamType ) -> HostResult<()> {
		let state = self.stream()?;
		state.accepts( stream )?;
		state.resume( stream );
		Ok(())
	}

	fn close_stream( &mut self, stream: StreamType ) -> HostResult<()> {
		let state = self.stream()?;
		state.accepts( stream )?;
		state.close( stream );
		Ok(())
	}

	fn http_call(
		&mut self,
		upstream: &[u8],
		headers: &[u8],
		body: &[u8],
		trailers: &[u8],
		timeout_milliseconds: u32,
	) -> HostResult<u32> {

		let upstream = utf8( upstream )?;
		let headers = HeaderMap::decode( headers )?;
		let trailers = HeaderMap::decode( trailers )?;

		let missing = [ ":method", ":path", ":authority" ].into_iter().find(| key | headers.get( key ).is_none() );
		if let Some( key ) = missing {
			tracing::warn!( upstream, key, "http call without a required pseudo-header" );
			return Err( HostError::BadArgument )
		}
		if !self.state.is_live( self.effective ) { return Err( HostError::BadArgument ) }

		let callout_id = self.state.next_callout_id();
		self.state.callouts.insert( callout_id, HttpCalloutAttributes {
			callout_id,
			context_id: self.effective,
			upstream: upstream.to_string(),
			headers,
			body: body.to_vec(),
			trailers,
			timeout: Duration::from_millis( u64::from( timeout_milliseconds )),
		});
		Ok( callout_id )

	}

	fn call_foreign_function( &mut self, name: &[u8], params: &[u8] ) -> HostResult<HostBytes<'_>> {
		let function = self.state.foreign_functions.get_mut( utf8( name )? ).ok_or( HostError::NotFound )?;
		function( params ).map( HostBytes::owned )
	}

	fn set_tick_period_milliseconds( &mut self, period: u32 ) -> HostResult<()> {
		self.state.tick_period = Duration::from_millis( u64::from( period ));
		Ok(())
	}

	fn set_effective_context( &mut self, context_id: u32 ) -> HostResult<()> {
		match self.state.is_live( context_id ) {
			true => { self.effective = context_id ; Ok(()) }
			false => {
				tracing::debug!( context_id, "set_effective_context on a dead or unknown context" );
				Err( HostError::BadArgument )
			}
		}
	}

	fn done( &mut self ) -> HostResult<()> {
		self.state.done = true ;
		Ok(())
	}

	fn define_metric( &mut self, metric_type: MetricType, name: &[u8] ) -> HostResult<u32> {
		let name = utf8( name )?;
		if let Some( metric_id ) = self.state.metric_id( metric_type, name ) { return Ok( metric_id ) }
		self.state.metrics.push( Metric { metric_type, name: name.to_string(), value: 0 });
		self.state.metric_id( metric_type, name ).ok_or( HostError::InternalFailure )
	}

	fn increment_metric( &mut self, metric_id: u32, offset: i64 ) -> HostResult<()> {
		let metric = self.state.metric_mut( metric_id )?;
		match metric.metric_type {
			MetricType::Counter => {
				metric.value = metric.value.checked_add_signed( offset ).ok_or( HostError::BadArgument )?;
				Ok(())
			}
			MetricType::Gauge | MetricType::Histogram => Err( HostError::BadArgument ),
		}
	}

	fn record_metric( &mut self, metric_id: u32, value: u64 ) -> HostResult<()> {
		let metric = self.state.metric_mut( metric_id )?;
		match metric.metric_type {
			MetricType::Gauge | MetricType::Histogram => { metric.value = value ; Ok(()) }
			MetricType::Counter => Err( HostError::BadArgument ),
		}
	}

	fn get_metric( &mut self, metric_id: u32 ) -> HostResult<u64> {
		self.state.metric_mut( metric_id ).map(| metric | metric.value )
	}

}

impl HostSession<'_> {

	fn callout_map( &self, map: MapType ) -> HostResult<&HeaderMap> {
		let response = self.state.callout_response.as_ref().ok_or( HostError::NotFound )?;
		Ok( match map {
			MapType::HttpCallResponseTrailers => &response.trailers,
			_ => &response.headers,
		})
	}

}
