use thiserror::Error ;

use crate::types::{ Status, StreamType };



/// Every way a host call can fail.
///
/// One variant per non-`Ok` [`Status`]; conversion in both directions is lossless.
#[derive( Error, Copy, Clone, Eq, PartialEq, Hash, Debug )]
pub enum HostError {
	/// The key, queue, property or metric is absent.
	#[error( "Not Found" )] NotFound,
	/// Malformed input, an invalid buffer-write combination or an invalid context reference.
	#[error( "Bad Argument" )] BadArgument,
	/// A wire encoding could not be decoded.
	#[error( "Serialization Failure" )] SerializationFailure,
	/// The target is valid but holds no data, e.g. an empty queue.
	#[error( "Empty" )] Empty,
	/// The supplied cas does not match the stored version.
	#[error( "CAS Mismatch" )] CasMismatch,
	/// Unexpected host-side fault.
	#[error( "Internal Failure" )] InternalFailure,
	/// The capability is not served by this host.
	#[error( "Unimplemented" )] Unimplemented,
}

/// Result of a host call.
pub type HostResult<T> = Result<T, HostError>;

/// Errors that can occur when dispatching a callback into a guest.
///
/// A failed dispatch is fatal to that one callback: the stream keeps the
/// action it had before the call.
#[derive( Error, Debug )]
pub enum DispatchError {
	/// The guest holds no context under this id.
	#[error( "Unknown Context: {0}" )] UnknownContext( u32 ),
	/// The context already received `on_delete`.
	#[error( "Context Deleted: {0}" )] ContextDeleted( u32 ),
	/// The guest closed this direction of the stream.
	#[error( "Stream Closed: context {0}, {1}" )] StreamClosed( u32, StreamType ),
	/// A host call made on behalf of the dispatch failed.
	#[error( "Host Error: {0}" )] Host( #[from] HostError ),
	/// The wasm guest trapped during execution.
	#[error( "Runtime Exception: {0}" )] RuntimeException( wasmtime::Error ),
	/// The wasm module lacks an export the dispatch requires.
	#[error( "Missing Export: {0}" )] MissingExport( String ),
	/// The guest returned a value the callback's contract does not allow.
	#[error( "Invalid Return from {0}: {1}" )] InvalidReturn( &'static str, i32 ),
}

impl DispatchError {

	/// The status a host would report for this failure at the ABI boundary.
	pub fn status( &self ) -> Status { match self {
		Self::UnknownContext( _ )
		| Self::ContextDeleted( _ )
		| Self::StreamClosed( _, _ )
		| Self::InvalidReturn( _, _ ) => Status::BadArgument,
		Self::Host( error ) => ( *error ).into(),
		Self::MissingExport( _ ) => Status::Unimplemented,
		Self::RuntimeException( _ ) => Status::InternalFailure,
	}}

}
