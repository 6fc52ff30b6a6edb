//! Ordered, case-insensitive header maps.

use crate::error::HostResult ;
use crate::marshal::{ decode_map, encode_map };



/// An ordered sequence of `( key, value )` pairs with unique, case-insensitive keys.
///
/// Keys are stored lower-cased. The mutation laws follow what proxies do with
/// header maps:
///
/// - [`add`]( Self::add ) on an existing key appends to its value.
/// - [`replace`]( Self::replace ) overwrites, or adds when the key is missing.
/// - [`remove`]( Self::remove ) deletes the entry and is a no-op when it is absent.
///
/// ```
/// use proxy_wasm_link::HeaderMap ;
///
/// let mut headers = HeaderMap::from_pairs([( "X-Trace", "a" )]);
/// headers.add( "x-trace", "b" );
/// assert_eq!( headers.get( "X-TRACE" ), Some( "ab" ));
/// ```
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct HeaderMap( Vec<( String, String )> );

impl HeaderMap {

	pub fn new() -> Self { Self( Vec::new() ) }

	/// Builds a map from pairs, lower-casing keys. A repeated key is merged with
	/// [`add`]( Self::add ) so the result never holds duplicates.
	pub fn from_pairs<K, V>( pairs: impl IntoIterator<Item = ( K, V )> ) -> Self
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let mut map = Self::new();
		pairs.into_iter().for_each(|( key, value )| map.add( key.as_ref(), value.as_ref() ));
		map
	}

	/// Looks a key up case-insensitively.
	///
	/// The value is trimmed of surrounding whitespace. A value that is empty
	/// after trimming counts as missing.
	pub fn get( &self, key: &str ) -> Option<&str> {
		self.position( key )
			.map(| index | self.0[index].1.trim() )
			.filter(| value | !value.is_empty() )
	}

	/// Appends `value` to the existing value of `key`, or inserts the pair.
	pub fn add( &mut self, key: &str, value: &str ) {
		match self.position( key ) {
			Some( index ) => self.0[index].1.push_str( value ),
			None => self.0.push(( key.to_ascii_lowercase(), value.to_string() )),
		}
	}

	/// Overwrites the value of `key`, or inserts the pair.
	pub fn replace( &mut self, key: &str, value: &str ) {
		match self.position( key ) {
			Some( index ) => value.clone_into( &mut self.0[index].1 ),
			None => self.0.push(( key.to_ascii_lowercase(), value.to_string() )),
		}
	}

	/// Removes `key`, returning its value if it was present.
	pub fn remove( &mut self, key: &str ) -> Option<String> {
		self.position( key ).map(| index | self.0.remove( index ).1 )
	}

	#[inline] pub fn pairs( &self ) -> &[( String, String )] { &self.0 }
	#[inline] pub fn into_pairs( self ) -> Vec<( String, String )> { self.0 }
	#[inline] pub fn len( &self ) -> usize { self.0.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.0.is_empty() }

	/// Encodes the map in the map wire format.
	pub fn encode( &self ) -> Vec<u8> { encode_map( &self.0 ) }

	/// Decodes the map wire format.
	///
	/// # Errors
	/// See [`decode_map`].
	pub fn decode( region: &[u8] ) -> HostResult<Self> {
		decode_map( region ).map( Self::from_pairs )
	}

	fn position( &self, key: &str ) -> Option<usize> {
		self.0.iter().position(|( stored, _ )| stored.eq_ignore_ascii_case( key ))
	}

}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<( K, V )> for HeaderMap {
	fn from_iter<I: IntoIterator<Item = ( K, V )>>( pairs: I ) -> Self { Self::from_pairs( pairs ) }
}

impl IntoIterator for HeaderMap {
	type Item = ( String, String );
	type IntoIter = std::vec::IntoIter<( String, String )>;
	fn into_iter( self ) -> Self::IntoIter { self.0.into_iter() }
}

impl<'a> IntoIterator for &'a HeaderMap {
	type Item = &'a ( String, String );
	type IntoIter = std::slice::Iter<'a, ( String, String )>;
	fn into_iter( self ) -> Self::IntoIter { self.0.iter() }
}
