//! Typed host calls for guest code.
//!
//! [`Hostcalls`] sits on top of any [`ProxyHost`] and does the marshalling:
//! header maps are encoded and decoded here, property paths are joined here,
//! and host-owned bytes are copied out before the call returns. Failures come
//! back as [`HostError`] untouched; nothing here retries.

use std::time::Duration ;

use crate::error::{ HostError, HostResult };
use crate::header_map::HeaderMap ;
use crate::host::ProxyHost ;
use crate::marshal::encode_property_path ;
use crate::types::{ BufferType, LogLevel, MapType, MetricType, StreamType };



/// Offset past any buffer end; writing there appends.
const BUFFER_END: usize = i32::MAX as usize ;

/// Typed access to the host for the duration of one guest callback.
pub struct Hostcalls<'h> {
	host: &'h mut dyn ProxyHost,
}

impl std::fmt::Debug for Hostcalls<'_> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Hostcalls" ).finish_non_exhaustive()
	}
}

impl<'h> Hostcalls<'h> {

	pub fn new( host: &'h mut dyn ProxyHost ) -> Self { Self { host }}

	/// The untyped call surface underneath.
	#[inline] pub fn raw( &mut self ) -> &mut dyn ProxyHost { self.host }

	/// Writes a message to the host's log.
	///
	/// # Errors
	/// Whatever the host reports.
	pub fn log( &mut self, level: LogLevel, message: &str ) -> HostResult<()> {
		self.host.log( level, message.as_bytes() )
	}

	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn log_trace( &mut self, message: &str ) -> HostResult<()> { self.log( LogLevel::Trace, message ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn log_debug( &mut self, message: &str ) -> HostResult<()> { self.log( LogLevel::Debug, message ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn log_info( &mut self, message: &str ) -> HostResult<()> { self.log( LogLevel::Info, message ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn log_warn( &mut self, message: &str ) -> HostResult<()> { self.log( LogLevel::Warn, message ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn log_error( &mut self, message: &str ) -> HostResult<()> { self.log( LogLevel::Error, message ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn log_critical( &mut self, message: &str ) -> HostResult<()> { self.log( LogLevel::Critical, message ) }

	/// Reads a property, e.g. `&["request", "path"]`.
	///
	/// # Errors
	/// [`HostError::BadArgument`] for an empty path, [`HostError::NotFound`]
	/// when the host has no such property.
	pub fn get_property( &mut self, path: &[&str] ) -> HostResult<Vec<u8>> {
		let path = encode_property_path( path )?;
		self.host.get_property( &path ).map(| bytes | bytes.into_vec() )
	}

	/// Reads a property holding a map.
	///
	/// # Errors
	/// As [`get_property`]( Self::get_property ), plus decoding failures.
	pub fn get_property_map( &mut self, path: &[&str] ) -> HostResult<HeaderMap> {
		let path = encode_property_path( path )?;
		HeaderMap::decode( &self.host.get_property( &path )? )
	}

	/// Writes a property.
	///
	/// # Errors
	/// [`HostError::BadArgument`] for an empty path or an empty value.
	pub fn set_property( &mut self, path: &[&str], value: &[u8] ) -> HostResult<()> {
		if value.is_empty() { return Err( HostError::BadArgument ) }
		let path = encode_property_path( path )?;
		self.host.set_property( &path, value )
	}

	/// Answers the current stream locally instead of forwarding it. A negative
	/// `grpc_status` means the response carries none.
	///
	/// # Errors
	/// [`HostError::BadArgument`] when the effective context is not a stream.
	pub fn send_http_response( &mut self, status_code: u32, headers: &HeaderMap, body: &[u8], grpc_status: i32 ) -> HostResult<()> {
		self.host.send_local_response( status_code, b"", body, &headers.encode(), grpc_status )
	}

	/// [`send_http_response`]( Self::send_http_response ) with a status detail and gRPC status.
	///
	/// # Errors
	/// [`HostError::BadArgument`] when the effective context is not a stream.
	pub fn send_local_response(
		&mut self,
		status_code: u32,
		status_code_detail: &str,
		headers: &HeaderMap,
		body: &[u8],
		grpc_status: Option<i32>,
	) -> HostResult<()> {
		self.host.send_local_response(
			status_code,
			status_code_detail.as_bytes(),
			body,
			&headers.encode(),
			grpc_status.unwrap_or( -1 ),
		)
	}

	/// Returns the value stored under `key` and its cas version.
	///
	/// # Errors
	/// [`HostError::NotFound`] for a missing key.
	pub fn get_shared_data( &mut self, key: &str ) -> HostResult<( Vec<u8>, u32 )> {
		self.host.get_shared_data( key.as_bytes() ).map(|( value, cas )| ( value.into_vec(), cas ))
	}

	/// Stores `value` under `key` if `cas` is still the current version.
	///
	/// # Errors
	/// [`HostError::CasMismatch`] when another writer got there first; reread and retry.
	pub fn set_shared_data( &mut self, key: &str, value: &[u8], cas: u32 ) -> HostResult<()> {
		self.host.set_shared_data( key.as_bytes(), value, cas )
	}

	#[allow( clippy::missing_errors_doc )]
	pub fn register_shared_queue( &mut self, name: &str ) -> HostResult<u32> {
		self.host.register_shared_queue( name.as_bytes() )
	}

	/// # Errors
	/// [`HostError::NotFound`] when no queue was registered under `( vm_id, name )`.
	pub fn resolve_shared_queue( &mut self, vm_id: &str, name: &str ) -> HostResult<u32> {
		self.host.resolve_shared_queue( vm_id.as_bytes(), name.as_bytes() )
	}

	/// # Errors
	/// [`HostError::NotFound`] for an unknown queue.
	pub fn enqueue_shared_queue( &mut self, queue_id: u32, value: &[u8] ) -> HostResult<()> {
		self.host.enqueue_shared_queue( queue_id, value )
	}

	/// # Errors
	/// [`HostError::Empty`] when the queue holds nothing, [`HostError::NotFound`] for an unknown queue.
	pub fn dequeue_shared_queue( &mut self, queue_id: u32 ) -> HostResult<Vec<u8>> {
		self.host.dequeue_shared_queue( queue_id ).map(| bytes | bytes.into_vec() )
	}

	/// Reads a whole header map.
	///
	/// # Errors
	/// Decoding failures, or [`HostError::BadArgument`] outside a stream.
	pub fn get_map( &mut self, map: MapType ) -> HostResult<HeaderMap> {
		HeaderMap::decode( &self.host.get_header_map_pairs( map )? )
	}

	/// Replaces a whole header map.
	///
	/// # Errors
	/// [`HostError::BadArgument`] outside a stream.
	pub fn set_map( &mut self, map: MapType, headers: &HeaderMap ) -> HostResult<()> {
		self.host.set_header_map_pairs( map, &headers.encode() )
	}

	/// Reads one value; keys are case-insensitive.
	///
	/// # Errors
	/// [`HostError::NotFound`] when the key is absent or its value is blank.
	pub fn get_map_value( &mut self, map: MapType, key: &str ) -> HostResult<String> {
		self.host.get_header_map_value( map, key.as_bytes() )?.into_string()
	}

	#[allow( clippy::missing_errors_doc )]
	pub fn add_map_value( &mut self, map: MapType, key: &str, value: &str ) -> HostResult<()> {
		self.host.add_header_map_value( map, key.as_bytes(), value.as_bytes() )
	}

	#[allow( clippy::missing_errors_doc )]
	pub fn replace_map_value( &mut self, map: MapType, key: &str, value: &str ) -> HostResult<()> {
		self.host.replace_header_map_value( map, key.as_bytes(), value.as_bytes() )
	}

	#[allow( clippy::missing_errors_doc )]
	pub fn remove_map_value( &mut self, map: MapType, key: &str ) -> HostResult<()> {
		self.host.remove_header_map_value( map, key.as_bytes() )
	}

	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_request_headers( &mut self ) -> HostResult<HeaderMap> { self.get_map( MapType::HttpRequestHeaders ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn set_http_request_headers( &mut self, headers: &HeaderMap ) -> HostResult<()> { self.set_map( MapType::HttpRequestHeaders, headers ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_request_header( &mut self, key: &str ) -> HostResult<String> { self.get_map_value( MapType::HttpRequestHeaders, key ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn add_http_request_header( &mut self, key: &str, value: &str ) -> HostResult<()> { self.add_map_value( MapType::HttpRequestHeaders, key, value ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn replace_http_request_header( &mut self, key: &str, value: &str ) -> HostResult<()> { self.replace_map_value( MapType::HttpRequestHeaders, key, value ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn remove_http_request_header( &mut self, key: &str ) -> HostResult<()> { self.remove_map_value( MapType::HttpRequestHeaders, key ) }

	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_request_trailers( &mut self ) -> HostResult<HeaderMap> { self.get_map( MapType::HttpRequestTrailers ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn set_http_request_trailers( &mut self, trailers: &HeaderMap ) -> HostResult<()> { self.set_map( MapType::HttpRequestTrailers, trailers ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_request_trailer( &mut self, key: &str ) -> HostResult<String> { self.get_map_value( MapType::HttpRequestTrailers, key ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn add_http_request_trailer( &mut self, key: &str, value: &str ) -> HostResult<()> { self.add_map_value( MapType::HttpRequestTrailers, key, value ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn replace_http_request_trailer( &mut self, key: &str, value: &str ) -> HostResult<()> { self.replace_map_value( MapType::HttpRequestTrailers, key, value ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn remove_http_request_trailer( &mut self, key: &str ) -> HostResult<()> { self.remove_map_value( MapType::HttpRequestTrailers, key ) }

	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_response_headers( &mut self ) -> HostResult<HeaderMap> { self.get_map( MapType::HttpResponseHeaders ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn set_http_response_headers( &mut self, headers: &HeaderMap ) -> HostResult<()> { self.set_map( MapType::HttpResponseHeaders, headers ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_response_header( &mut self, key: &str ) -> HostResult<String> { self.get_map_value( MapType::HttpResponseHeaders, key ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn add_http_response_header( &mut self, key: &str, value: &str ) -> HostResult<()> { self.add_map_value( MapType::HttpResponseHeaders, key, value ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn replace_http_response_header( &mut self, key: &str, value: &str ) -> HostResult<()> { self.replace_map_value( MapType::HttpResponseHeaders, key, value ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn remove_http_response_header( &mut self, key: &str ) -> HostResult<()> { self.remove_map_value( MapType::HttpResponseHeaders, key ) }

	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_response_trailers( &mut self ) -> HostResult<HeaderMap> { self.get_map( MapType::HttpResponseTrailers ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn set_http_response_trailers( &mut self, trailers: &HeaderMap ) -> HostResult<()> { self.set_map( MapType::HttpResponseTrailers, trailers ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_response_trailer( &mut self, key: &str ) -> HostResult<String> { self.get_map_value( MapType::HttpResponseTrailers, key ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn add_http_response_trailer( &mut self, key: &str, value: &str ) -> HostResult<()> { self.add_map_value( MapType::HttpResponseTrailers, key, value ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn replace_http_response_trailer( &mut self, key: &str, value: &str ) -> HostResult<()> { self.replace_map_value( MapType::HttpResponseTrailers, key, value ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn remove_http_response_trailer( &mut self, key: &str ) -> HostResult<()> { self.remove_map_value( MapType::HttpResponseTrailers, key ) }

	/// Headers of the callout response being delivered; only readable inside
	/// [`Context::on_http_call_response`]( crate::Context::on_http_call_response ).
	///
	/// # Errors
	/// [`HostError::NotFound`] outside a callout response.
	#[inline] pub fn get_http_call_response_headers( &mut self ) -> HostResult<HeaderMap> { self.get_map( MapType::HttpCallResponseHeaders ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_call_response_header( &mut self, key: &str ) -> HostResult<String> { self.get_map_value( MapType::HttpCallResponseHeaders, key ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_call_response_trailers( &mut self ) -> HostResult<HeaderMap> { self.get_map( MapType::HttpCallResponseTrailers ) }

	/// Reads up to `max_size` bytes of a buffer from `start`.
	///
	/// # Errors
	/// [`HostError::NotFound`] for an empty buffer, [`HostError::BadArgument`]
	/// when `start` is past its end.
	pub fn get_buffer( &mut self, buffer: BufferType, start: usize, max_size: usize ) -> HostResult<Vec<u8>> {
		self.host.get_buffer_bytes( buffer, start, max_size ).map(| bytes | bytes.into_vec() )
	}

	/// Writes into a buffer. Only three placements exist: `( 0, 0 )` prepends,
	/// `( 0, n )` with `n` at least the buffer length replaces, and a `start`
	/// at or past the end appends.
	///
	/// # Errors
	/// [`HostError::BadArgument`] for any other placement.
	pub fn set_buffer( &mut self, buffer: BufferType, start: usize, max_size: usize, data: &[u8] ) -> HostResult<()> {
		self.host.set_buffer_bytes( buffer, start, max_size, data )
	}

	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn append_buffer( &mut self, buffer: BufferType, data: &[u8] ) -> HostResult<()> { self.set_buffer( buffer, BUFFER_END, 0, data ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn prepend_buffer( &mut self, buffer: BufferType, data: &[u8] ) -> HostResult<()> { self.set_buffer( buffer, 0, 0, data ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn replace_buffer( &mut self, buffer: BufferType, data: &[u8] ) -> HostResult<()> { self.set_buffer( buffer, 0, BUFFER_END, data ) }

	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_request_body( &mut self, start: usize, max_size: usize ) -> HostResult<Vec<u8>> { self.get_buffer( BufferType::HttpRequestBody, start, max_size ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn append_http_request_body( &mut self, data: &[u8] ) -> HostResult<()> { self.append_buffer( BufferType::HttpRequestBody, data ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn prepend_http_request_body( &mut self, data: &[u8] ) -> HostResult<()> { self.prepend_buffer( BufferType::HttpRequestBody, data ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn replace_http_request_body( &mut self, data: &[u8] ) -> HostResult<()> { self.replace_buffer( BufferType::HttpRequestBody, data ) }

	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_response_body( &mut self, start: usize, max_size: usize ) -> HostResult<Vec<u8>> { self.get_buffer( BufferType::HttpResponseBody, start, max_size ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn append_http_response_body( &mut self, data: &[u8] ) -> HostResult<()> { self.append_buffer( BufferType::HttpResponseBody, data ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn prepend_http_response_body( &mut self, data: &[u8] ) -> HostResult<()> { self.prepend_buffer( BufferType::HttpResponseBody, data ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn replace_http_response_body( &mut self, data: &[u8] ) -> HostResult<()> { self.replace_buffer( BufferType::HttpResponseBody, data ) }

	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_downstream_data( &mut self, start: usize, max_size: usize ) -> HostResult<Vec<u8>> { self.get_buffer( BufferType::DownstreamData, start, max_size ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn append_downstream_data( &mut self, data: &[u8] ) -> HostResult<()> { self.append_buffer( BufferType::DownstreamData, data ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn prepend_downstream_data( &mut self, data: &[u8] ) -> HostResult<()> { self.prepend_buffer( BufferType::DownstreamData, data ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn replace_downstream_data( &mut self, data: &[u8] ) -> HostResult<()> { self.replace_buffer( BufferType::DownstreamData, data ) }

	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_upstream_data( &mut self, start: usize, max_size: usize ) -> HostResult<Vec<u8>> { self.get_buffer( BufferType::UpstreamData, start, max_size ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn append_upstream_data( &mut self, data: &[u8] ) -> HostResult<()> { self.append_buffer( BufferType::UpstreamData, data ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn prepend_upstream_data( &mut self, data: &[u8] ) -> HostResult<()> { self.prepend_buffer( BufferType::UpstreamData, data ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn replace_upstream_data( &mut self, data: &[u8] ) -> HostResult<()> { self.replace_buffer( BufferType::UpstreamData, data ) }

	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn get_http_call_response_body( &mut self, start: usize, max_size: usize ) -> HostResult<Vec<u8>> { self.get_buffer( BufferType::HttpCallResponseBody, start, max_size ) }

	/// The configuration the VM was started with.
	///
	/// # Errors
	/// [`HostError::NotFound`] when the VM has no configuration.
	pub fn get_vm_configuration( &mut self ) -> HostResult<Vec<u8>> { self.get_buffer( BufferType::VmConfiguration, 0, BUFFER_END ) }

	/// The configuration the plugin was started with.
	///
	/// # Errors
	/// [`HostError::NotFound`] when the plugin has no configuration.
	pub fn get_plugin_configuration( &mut self ) -> HostResult<Vec<u8>> { self.get_buffer( BufferType::PluginConfiguration, 0, BUFFER_END ) }

	/// Lets a paused stream direction proceed.
	///
	/// # Errors
	/// [`HostError::BadArgument`] when the effective context is not a stream.
	pub fn continue_stream( &mut self, stream: StreamType ) -> HostResult<()> { self.host.continue_stream( stream ) }

	/// Terminates one direction of the stream.
	///
	/// # Errors
	/// [`HostError::BadArgument`] when the effective context is not a stream.
	pub fn close_stream( &mut self, stream: StreamType ) -> HostResult<()> { self.host.close_stream( stream ) }

	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn resume_http_request( &mut self ) -> HostResult<()> { self.continue_stream( StreamType::Request ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn resume_http_response( &mut self ) -> HostResult<()> { self.continue_stream( StreamType::Response ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn close_http_request( &mut self ) -> HostResult<()> { self.close_stream( StreamType::Request ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn close_http_response( &mut self ) -> HostResult<()> { self.close_stream( StreamType::Response ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn resume_downstream( &mut self ) -> HostResult<()> { self.continue_stream( StreamType::Downstream ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn resume_upstream( &mut self ) -> HostResult<()> { self.continue_stream( StreamType::Upstream ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn close_downstream( &mut self ) -> HostResult<()> { self.close_stream( StreamType::Downstream ) }
	#[allow( clippy::missing_errors_doc )]
	#[inline] pub fn close_upstream( &mut self ) -> HostResult<()> { self.close_stream( StreamType::Upstream ) }

	/// Starts an HTTP callout to `upstream` (a cluster name). The response
	/// arrives later through
	/// [`Context::on_http_call_response`]( crate::Context::on_http_call_response )
	/// carrying the id returned here.
	///
	/// # Errors
	/// [`HostError::BadArgument`] when `headers` lack `:method`, `:path` or
	/// `:authority`, or the timeout does not fit in 32-bit milliseconds.
	pub fn dispatch_http_call(
		&mut self,
		upstream: &str,
		headers: &HeaderMap,
		body: &[u8],
		trailers: &HeaderMap,
		timeout: Duration,
	) -> HostResult<u32> {
		let timeout = u32::try_from( timeout.as_millis() ).map_err(|_| HostError::BadArgument )?;
		self.host.http_call( upstream.as_bytes(), &headers.encode(), body, &trailers.encode(), timeout )
	}

	/// # Errors
	/// [`HostError::NotFound`] when the host has no function under `name`.
	pub fn call_foreign_function( &mut self, name: &str, params: &[u8] ) -> HostResult<Vec<u8>> {
		self.host.call_foreign_function( name.as_bytes(), params ).map(| bytes | bytes.into_vec() )
	}

	/// Asks for `on_tick` every `period`; zero disables ticking.
	///
	/// # Errors
	/// [`HostError::BadArgument`] when the period does not fit in 32-bit milliseconds.
	pub fn set_tick_period( &mut self, period: Duration ) -> HostResult<()> {
		let period = u32::try_from( period.as_millis() ).map_err(|_| HostError::BadArgument )?;
		self.host.set_tick_period_milliseconds( period )
	}

	/// Makes later host calls in this callback act on `context_id`.
	///
	/// # Errors
	/// [`HostError::BadArgument`] for an unknown or deleted context.
	pub fn set_effective_context( &mut self, context_id: u32 ) -> HostResult<()> {
		self.host.set_effective_context( context_id )
	}

	/// Signals that a plugin which deferred in `on_done` has finished.
	///
	/// # Errors
	/// Whatever the host reports.
	pub fn done( &mut self ) -> HostResult<()> { self.host.done() }

	/// Defines a metric, or returns the id it already has.
	///
	/// # Errors
	/// Whatever the host reports.
	pub fn define_metric( &mut self, metric_type: MetricType, name: &str ) -> HostResult<u32> {
		self.host.define_metric( metric_type, name.as_bytes() )
	}

	/// # Errors
	/// [`HostError::NotFound`] for an unknown metric, [`HostError::BadArgument`] unless it is a counter.
	pub fn increment_metric( &mut self, metric_id: u32, offset: i64 ) -> HostResult<()> {
		self.host.increment_metric( metric_id, offset )
	}

	/// # Errors
	/// [`HostError::NotFound`] for an unknown metric, [`HostError::BadArgument`] for a counter.
	pub fn record_metric( &mut self, metric_id: u32, value: u64 ) -> HostResult<()> {
		self.host.record_metric( metric_id, value )
	}

	/// # Errors
	/// [`HostError::NotFound`] for an unknown metric.
	pub fn get_metric( &mut self, metric_id: u32 ) -> HostResult<u64> {
		self.host.get_metric( metric_id )
	}

}
