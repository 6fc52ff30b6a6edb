//! Closed enumerations of the Proxy-Wasm ABI.
//!
//! Every enumeration converts to and from the raw integer the boundary carries.
//! Decoding is strict: a raw value outside the ABI is a [`HostError::BadArgument`],
//! a value the ABI defines but this crate does not serve (the gRPC variants) is
//! [`HostError::Unimplemented`]. Inside the crate all dispatch is an exhaustive
//! `match`, there is no fallback arm.

use crate::error::HostError ;



/// Result code of every host call.
///
/// `Ok` is the only success; every other variant has a matching [`HostError`].
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug )]
pub enum Status {
	Ok,
	NotFound,
	BadArgument,
	SerializationFailure,
	Empty,
	CasMismatch,
	InternalFailure,
	Unimplemented,
}

impl Status {

	/// Maps a raw status code. Codes this ABI does not define are `InternalFailure`.
	pub const fn from_raw( code: u32 ) -> Self { match code {
		0 => Self::Ok,
		1 => Self::NotFound,
		2 => Self::BadArgument,
		3 => Self::SerializationFailure,
		7 => Self::Empty,
		8 => Self::CasMismatch,
		12 => Self::Unimplemented,
		_ => Self::InternalFailure,
	}}

	/// The code written across the boundary.
	pub const fn as_raw( self ) -> u32 { match self {
		Self::Ok => 0,
		Self::NotFound => 1,
		Self::BadArgument => 2,
		Self::SerializationFailure => 3,
		Self::Empty => 7,
		Self::CasMismatch => 8,
		Self::InternalFailure => 10,
		Self::Unimplemented => 12,
	}}

	/// Splits the status into success or the corresponding [`HostError`].
	///
	/// # Errors
	/// Every status other than [`Status::Ok`].
	pub const fn into_result( self ) -> Result<(), HostError> { match self {
		Self::Ok => Ok(()),
		Self::NotFound => Err( HostError::NotFound ),
		Self::BadArgument => Err( HostError::BadArgument ),
		Self::SerializationFailure => Err( HostError::SerializationFailure ),
		Self::Empty => Err( HostError::Empty ),
		Self::CasMismatch => Err( HostError::CasMismatch ),
		Self::InternalFailure => Err( HostError::InternalFailure ),
		Self::Unimplemented => Err( HostError::Unimplemented ),
	}}

}

impl From<HostError> for Status {
	fn from( error: HostError ) -> Self { match error {
		HostError::NotFound => Self::NotFound,
		HostError::BadArgument => Self::BadArgument,
		HostError::SerializationFailure => Self::SerializationFailure,
		HostError::Empty => Self::Empty,
		HostError::CasMismatch => Self::CasMismatch,
		HostError::InternalFailure => Self::InternalFailure,
		HostError::Unimplemented => Self::Unimplemented,
	}}
}

impl<T> From<&Result<T, HostError>> for Status {
	fn from( result: &Result<T, HostError> ) -> Self { match result {
		Ok( _ ) => Self::Ok,
		Err( error ) => ( *error ).into(),
	}}
}

impl std::fmt::Display for Status {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "{:?}", self )}
}

/// Result of each stream-phase callback.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default )]
pub enum Action {
	/// Forward whatever is buffered and keep processing.
	#[default] Continue,
	/// Hold the stream; buffered bytes are retained for the next phase.
	Pause,
}

impl Action {

	/// # Errors
	/// [`HostError::BadArgument`] for anything but 0 or 1.
	pub const fn from_raw( raw: u32 ) -> Result<Self, HostError> { match raw {
		0 => Ok( Self::Continue ),
		1 => Ok( Self::Pause ),
		_ => Err( HostError::BadArgument ),
	}}

	pub const fn as_raw( self ) -> u32 { match self {
		Self::Continue => 0,
		Self::Pause => 1,
	}}

}

/// Severity of a guest log message.
#[derive( Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug )]
pub enum LogLevel { Trace, Debug, Info, Warn, Error, Critical }

impl LogLevel {

	pub const ALL: [LogLevel; 6] = [ Self::Trace, Self::Debug, Self::Info, Self::Warn, Self::Error, Self::Critical ];

	/// # Errors
	/// [`HostError::BadArgument`] for levels outside 0..=5.
	pub const fn from_raw( raw: u32 ) -> Result<Self, HostError> { match raw {
		0 => Ok( Self::Trace ),
		1 => Ok( Self::Debug ),
		2 => Ok( Self::Info ),
		3 => Ok( Self::Warn ),
		4 => Ok( Self::Error ),
		5 => Ok( Self::Critical ),
		_ => Err( HostError::BadArgument ),
	}}

	pub const fn as_raw( self ) -> u32 { match self {
		Self::Trace => 0,
		Self::Debug => 1,
		Self::Info => 2,
		Self::Warn => 3,
		Self::Error => 4,
		Self::Critical => 5,
	}}

}

/// Header-like maps a host call can address.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug )]
pub enum MapType {
	HttpRequestHeaders,
	HttpRequestTrailers,
	HttpResponseHeaders,
	HttpResponseTrailers,
	HttpCallResponseHeaders,
	HttpCallResponseTrailers,
}

impl MapType {

	/// # Errors
	/// [`HostError::Unimplemented`] for the gRPC metadata maps (4, 5),
	/// [`HostError::BadArgument`] for values the ABI does not define.
	pub const fn from_raw( raw: u32 ) -> Result<Self, HostError> { match raw {
		0 => Ok( Self::HttpRequestHeaders ),
		1 => Ok( Self::HttpRequestTrailers ),
		2 => Ok( Self::HttpResponseHeaders ),
		3 => Ok( Self::HttpResponseTrailers ),
		4 | 5 => Err( HostError::Unimplemented ),
		6 => Ok( Self::HttpCallResponseHeaders ),
		7 => Ok( Self::HttpCallResponseTrailers ),
		_ => Err( HostError::BadArgument ),
	}}

	pub const fn as_raw( self ) -> u32 { match self {
		Self::HttpRequestHeaders => 0,
		Self::HttpRequestTrailers => 1,
		Self::HttpResponseHeaders => 2,
		Self::HttpResponseTrailers => 3,
		Self::HttpCallResponseHeaders => 6,
		Self::HttpCallResponseTrailers => 7,
	}}

}

/// Byte buffers a host call can address.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug )]
pub enum BufferType {
	HttpRequestBody,
	HttpResponseBody,
	DownstreamData,
	UpstreamData,
	HttpCallResponseBody,
	VmConfiguration,
	PluginConfiguration,
}

impl BufferType {

	/// # Errors
	/// [`HostError::Unimplemented`] for the gRPC receive buffer (5),
	/// [`HostError::BadArgument`] for values the ABI does not define.
	pub const fn from_raw( raw: u32 ) -> Result<Self, HostError> { match raw {
		0 => Ok( Self::HttpRequestBody ),
		1 => Ok( Self::HttpResponseBody ),
		2 => Ok( Self::DownstreamData ),
		3 => Ok( Self::UpstreamData ),
		4 => Ok( Self::HttpCallResponseBody ),
		5 => Err( HostError::Unimplemented ),
		6 => Ok( Self::VmConfiguration ),
		7 => Ok( Self::PluginConfiguration ),
		_ => Err( HostError::BadArgument ),
	}}

	pub const fn as_raw( self ) -> u32 { match self {
		Self::HttpRequestBody => 0,
		Self::HttpResponseBody => 1,
		Self::DownstreamData => 2,
		Self::UpstreamData => 3,
		Self::HttpCallResponseBody => 4,
		Self::VmConfiguration => 6,
		Self::PluginConfiguration => 7,
	}}

}

/// One direction of an HTTP or TCP stream.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug )]
pub enum StreamType { Request, Response, Downstream, Upstream }

impl StreamType {

	/// # Errors
	/// [`HostError::BadArgument`] for values outside 0..=3.
	pub const fn from_raw( raw: u32 ) -> Result<Self, HostError> { match raw {
		0 => Ok( Self::Request ),
		1 => Ok( Self::Response ),
		2 => Ok( Self::Downstream ),
		3 => Ok( Self::Upstream ),
		_ => Err( HostError::BadArgument ),
	}}

	pub const fn as_raw( self ) -> u32 { match self {
		Self::Request => 0,
		Self::Response => 1,
		Self::Downstream => 2,
		Self::Upstream => 3,
	}}

}

impl std::fmt::Display for StreamType {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "{:?}", self )}
}

#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug )]
pub enum MetricType { Counter, Gauge, Histogram }

impl MetricType {

	/// # Errors
	/// [`HostError::BadArgument`] for values outside 0..=2.
	pub const fn from_raw( raw: u32 ) -> Result<Self, HostError> { match raw {
		0 => Ok( Self::Counter ),
		1 => Ok( Self::Gauge ),
		2 => Ok( Self::Histogram ),
		_ => Err( HostError::BadArgument ),
	}}

	pub const fn as_raw( self ) -> u32 { match self {
		Self::Counter => 0,
		Self::Gauge => 1,
		Self::Histogram => 2,
	}}

}

/// Which side closed a TCP connection.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default )]
pub enum PeerType { #[default] Unknown, Local, Remote }

impl PeerType {

	/// # Errors
	/// [`HostError::BadArgument`] for values outside 0..=2.
	pub const fn from_raw( raw: u32 ) -> Result<Self, HostError> { match raw {
		0 => Ok( Self::Unknown ),
		1 => Ok( Self::Local ),
		2 => Ok( Self::Remote ),
		_ => Err( HostError::BadArgument ),
	}}

	pub const fn as_raw( self ) -> u32 { match self {
		Self::Unknown => 0,
		Self::Local => 1,
		Self::Remote => 2,
	}}

}
