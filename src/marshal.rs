//! Wire encodings for values crossing the host boundary.
//!
//! Two formats exist. Maps are length-prefixed:
//!
//! ```text
//! count:u32 | ( key_len:u32, value_len:u32 ) * count | ( key \0 value \0 ) * count
//! ```
//!
//! Property paths are their segments joined by a single NUL byte, with no
//! prefix and no trailing NUL. All integers are little-endian, the byte order
//! of wasm linear memory.
//!
//! Decoders copy out of the region they are given. The region belongs to the
//! other side of the boundary and is not assumed to outlive the call.

use itertools::Itertools ;
use nonempty_collections::NEVec ;
use pipe_trait::Pipe ;

use crate::error::{ HostError, HostResult };



const COUNT_SIZE: usize = 4 ;
const LENGTHS_SIZE: usize = 8 ;

/// Encodes ordered pairs in the map wire format.
///
/// An empty map encodes to a bare zero count.
pub fn encode_map<K, V>( pairs: &[( K, V )] ) -> Vec<u8>
where
	K: AsRef<[u8]>,
	V: AsRef<[u8]>,
{
	let data_size = pairs.iter()
		.map(|( key, value )| key.as_ref().len() + value.as_ref().len() + 2 )
		.sum::<usize>();
	let mut encoded = Vec::with_capacity( COUNT_SIZE + pairs.len() * LENGTHS_SIZE + data_size );

	encoded.extend_from_slice( &wire_u32( pairs.len() ).to_le_bytes() );
	pairs.iter().for_each(|( key, value )| {
		encoded.extend_from_slice( &wire_u32( key.as_ref().len() ).to_le_bytes() );
		encoded.extend_from_slice( &wire_u32( value.as_ref().len() ).to_le_bytes() );
	});
	pairs.iter().for_each(|( key, value )| {
		encoded.extend_from_slice( key.as_ref() );
		encoded.push( 0 );
		encoded.extend_from_slice( value.as_ref() );
		encoded.push( 0 );
	});

	encoded
}

/// Decodes the map wire format back into ordered pairs.
///
/// A zero-length region is an empty map.
///
/// # Errors
/// - [`HostError::BadArgument`] if the count claims more pairs than the region can hold.
/// - [`HostError::SerializationFailure`] if the data section is truncated, a
///   NUL terminator is missing, or a key or value is not UTF-8.
pub fn decode_map( region: &[u8] ) -> HostResult<Vec<( String, String )>> {

	if region.is_empty() { return Ok( Vec::new() ) }

	let count = read_u32( region, 0 ).ok_or( HostError::SerializationFailure )? as usize ;

	// Every pair needs its two lengths plus at least two terminators.
	let minimum_size = count
		.checked_mul( LENGTHS_SIZE + 2 )
		.and_then(| size | size.checked_add( COUNT_SIZE ))
		.ok_or( HostError::BadArgument )?;
	if minimum_size > region.len() { return Err( HostError::BadArgument ) }

	let ( header, data ) = region.split_at( COUNT_SIZE + count * LENGTHS_SIZE );
	let mut cursor = 0 ;

	header[COUNT_SIZE..]
		.chunks_exact( LENGTHS_SIZE )
		.map(| lengths | ( read_u32( lengths, 0 ), read_u32( lengths, 4 )))
		.map(|( key_len, value_len )| {
			let key = take_terminated( data, &mut cursor, key_len )?;
			let value = take_terminated( data, &mut cursor, value_len )?;
			Ok::<_, HostError>(( key, value ))
		})
		.collect()

}

/// A non-empty path into the host's property tree, e.g. `["request", "path"]`.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct PropertyPath( NEVec<String> );

impl PropertyPath {

	/// Builds a path from its segments.
	///
	/// # Errors
	/// [`HostError::BadArgument`] when there are no segments.
	pub fn new<S: Into<String>>( segments: impl IntoIterator<Item = S> ) -> HostResult<Self> {
		segments.into_iter()
			.map( Into::into )
			.collect::<Vec<String>>()
			.pipe( NEVec::try_from_vec )
			.map( Self )
			.ok_or( HostError::BadArgument )
	}

	/// Path segments in order.
	pub fn segments( &self ) -> impl Iterator<Item = &str> {
		self.0.iter().into_iter().map( String::as_str )
	}

	/// Encodes the path: segments joined by NUL.
	pub fn encode( &self ) -> Vec<u8> {
		Itertools::intersperse( self.segments().map( str::as_bytes ), b"\0".as_slice() )
			.flatten()
			.copied()
			.collect()
	}

	/// Decodes a NUL-joined path.
	///
	/// # Errors
	/// - [`HostError::BadArgument`] for an empty region.
	/// - [`HostError::SerializationFailure`] if a segment is not UTF-8.
	pub fn decode( region: &[u8] ) -> HostResult<Self> {
		if region.is_empty() { return Err( HostError::BadArgument ) }
		region.split(| byte | *byte == 0 )
			.map(| segment | String::from_utf8( segment.to_vec() ).map_err(|_| HostError::SerializationFailure ))
			.collect::<HostResult<Vec<_>>>()?
			.pipe( Self::new )
	}

}

impl std::fmt::Display for PropertyPath {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		write!( f, "{}", self.segments().join( "." ))
	}
}

/// Encodes a path given as plain segments.
///
/// # Errors
/// [`HostError::BadArgument`] when `segments` is empty.
pub fn encode_property_path( segments: &[&str] ) -> HostResult<Vec<u8>> {
	PropertyPath::new( segments.iter().copied() ).map(| path | path.encode() )
}

#[inline]
fn read_u32( bytes: &[u8], offset: usize ) -> Option<u32> {
	bytes.get( offset..offset + 4 )
		.and_then(| slice | <[u8; 4]>::try_from( slice ).ok() )
		.map( u32::from_le_bytes )
}

// Lengths on the wire are u32; a larger field cannot be addressed by the guest anyway.
#[inline]
#[allow( clippy::cast_possible_truncation )]
fn wire_u32( len: usize ) -> u32 { len as u32 }

fn take_terminated( data: &[u8], cursor: &mut usize, len: Option<u32> ) -> HostResult<String> {
	let len = len.ok_or( HostError::SerializationFailure )? as usize ;
	let end = cursor.checked_add( len ).ok_or( HostError::SerializationFailure )?;
	let field = data.get( *cursor..end ).ok_or( HostError::SerializationFailure )?;
	match data.get( end ) {
		Some( 0 ) => {}
		_ => return Err( HostError::SerializationFailure ),
	}
	*cursor = end + 1 ;
	String::from_utf8( field.to_vec() ).map_err(|_| HostError::SerializationFailure )
}
