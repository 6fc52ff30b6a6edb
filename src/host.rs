//! The host-call surface, shaped like the ABI.
//!
//! [`ProxyHost`] has one method per host capability. Arguments are the byte
//! regions the guest would pass as `( pointer, length )` pairs: maps arrive
//! already encoded with [`encode_map`]( crate::marshal::encode_map ), property
//! paths NUL-joined. Typed access lives one layer up in
//! [`Hostcalls`]( crate::Hostcalls ).
//!
//! Calls that hand bytes back to the guest return [`HostBytes`]. On the wire the
//! guest supplies a pointer-to-pointer and a pointer-to-size and the host
//! writes the address of memory it owns into them; that memory is only good
//! until the next host call. Here the same rule is a borrow: the returned bytes
//! borrow the host, so they must be copied out or dropped before the next call.

use std::borrow::Cow ;
use std::ops::Deref ;

use crate::error::{ HostError, HostResult };
use crate::types::{ BufferType, LogLevel, MapType, MetricType, StreamType };



/// Bytes returned by a host call, valid until the next call on the same host.
#[derive( Debug, Clone, PartialEq, Eq, Default )]
pub struct HostBytes<'a>( Cow<'a, [u8]> );

impl<'a> HostBytes<'a> {

	#[inline] pub fn borrowed( bytes: &'a [u8] ) -> Self { Self( Cow::Borrowed( bytes )) }
	#[inline] pub fn owned( bytes: Vec<u8> ) -> Self { Self( Cow::Owned( bytes )) }

	/// Copies the bytes out of the host's keeping.
	#[inline] pub fn into_vec( self ) -> Vec<u8> { self.0.into_owned() }

	/// # Errors
	/// [`HostError::SerializationFailure`] if the bytes are not UTF-8.
	pub fn into_string( self ) -> HostResult<String> {
		String::from_utf8( self.into_vec() ).map_err(|_| HostError::SerializationFailure )
	}

}

impl Deref for HostBytes<'_> {
	type Target = [u8];
	fn deref( &self ) -> &[u8] { &self.0 }
}

impl AsRef<[u8]> for HostBytes<'_> {
	fn as_ref( &self ) -> &[u8] { &self.0 }
}

/// The call surface a host exposes to a guest.
///
/// Implemented by [`HostSession`]( crate::emulator::HostSession ) for the
/// in-memory emulator; a guest written against [`Hostcalls`]( crate::Hostcalls )
/// runs unchanged on any implementation.
///
/// Every method is synchronous. Work that is asynchronous on a real proxy
/// (an HTTP callout) returns an id immediately and completes later through a
/// separate guest callback.
pub trait ProxyHost {

	fn log( &mut self, level: LogLevel, message: &[u8] ) -> HostResult<()> ;

	fn get_property( &mut self, path: &[u8] ) -> HostResult<HostBytes<'_>> ;
	fn set_property( &mut self, path: &[u8], value: &[u8] ) -> HostResult<()> ;

	/// Short-circuits the current stream with a locally generated response.
	/// `headers` is map-encoded; a negative `grpc_status` means none.
	fn send_local_response(
		&mut self,
		status_code: u32,
		status_code_detail: &[u8],
		body: &[u8],
		headers: &[u8],
		grpc_status: i32,
	) -> HostResult<()> ;

	/// Returns the value and its cas version.
	fn get_shared_data( &mut self, key: &[u8] ) -> HostResult<( HostBytes<'_>, u32 )> ;
	fn set_shared_data( &mut self, key: &[u8], value: &[u8], cas: u32 ) -> HostResult<()> ;

	fn register_shared_queue( &mut self, name: &[u8] ) -> HostResult<u32> ;
	fn resolve_shared_queue( &mut self, vm_id: &[u8], name: &[u8] ) -> HostResult<u32> ;
	fn dequeue_shared_queue( &mut self, queue_id: u32 ) -> HostResult<HostBytes<'_>> ;
	fn enqueue_shared_queue( &mut self, queue_id: u32, value: &[u8] ) -> HostResult<()> ;

	fn get_header_map_value( &mut self, map: MapType, key: &[u8] ) -> HostResult<HostBytes<'_>> ;
	fn add_header_map_value( &mut self, map: MapType, key: &[u8], value: &[u8] ) -> HostResult<()> ;
	fn replace_header_map_value( &mut self, map: MapType, key: &[u8], value: &[u8] ) -> HostResult<()> ;
	fn remove_header_map_value( &mut self, map: MapType, key: &[u8] ) -> HostResult<()> ;
	/// Returns the whole map, map-encoded.
	fn get_header_map_pairs( &mut self, map: MapType ) -> HostResult<HostBytes<'_>> ;
	/// Replaces the whole map with a map-encoded one.
	fn set_header_map_pairs( &mut self, map: MapType, pairs: &[u8] ) -> HostResult<()> ;

	fn get_buffer_bytes( &mut self, buffer: BufferType, start: usize, max_size: usize ) -> HostResult<HostBytes<'_>> ;
	fn set_buffer_bytes( &mut self, buffer: BufferType, start: usize, max_size: usize, data: &[u8] ) -> HostResult<()> ;

	fn continue_stream( &mut self, stream: StreamType ) -> HostResult<()> ;
	fn close_stream( &mut self, stream: StreamType ) -> HostResult<()> ;

	/// Starts an HTTP callout and returns its correlation id. `headers` and
	/// `trailers` are map-encoded.
	fn http_call(
		&mut self,
		upstream: &[u8],
		headers: &[u8],
		body: &[u8],
		trailers: &[u8],
		timeout_milliseconds: u32,
	) -> HostResult<u32> ;

	fn call_foreign_function( &mut self, name: &[u8], params: &[u8] ) -> HostResult<HostBytes<'_>> ;

	fn set_tick_period_milliseconds( &mut self, period: u32 ) -> HostResult<()> ;
	fn set_effective_context( &mut self, context_id: u32 ) -> HostResult<()> ;
	fn done( &mut self ) -> HostResult<()> ;

	fn define_metric( &mut self, metric_type: MetricType, name: &[u8] ) -> HostResult<u32> ;
	fn increment_metric( &mut self, metric_id: u32, offset: i64 ) -> HostResult<()> ;
	fn record_metric( &mut self, metric_id: u32, value: u64 ) -> HostResult<()> ;
	fn get_metric( &mut self, metric_id: u32 ) -> HostResult<u64> ;

}
