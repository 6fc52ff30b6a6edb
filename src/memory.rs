//! The linear-memory side of the host boundary.
//!
//! Guests pass every argument as a `( pointer, size )` pair into their own
//! memory. Results travel the other way by double indirection: the guest
//! hands over two out-pointers, the host allocates a region inside the guest
//! through the guest's own allocator, copies the bytes there and writes the
//! region's address and size through the out-pointers. Ownership of that
//! region passes to the guest.

use wasmtime::{ AsContext, AsContextMut, Caller, Extern, Memory };

use crate::error::{ HostError, HostResult };



/// Allocator exports tried in order.
const ALLOCATORS: [&str; 2] = [ "proxy_on_memory_allocate", "malloc" ];

/// Guest pointers and sizes cross the boundary as `i32` but are unsigned.
#[inline]
pub(crate) fn address( raw: i32 ) -> usize { u32::from_ne_bytes( raw.to_ne_bytes() ) as usize }

/// The exported `memory` of the guest being called.
#[derive( Debug, Clone, Copy )]
pub(crate) struct GuestMemory( Memory );

impl GuestMemory {

	/// # Errors
	/// [`HostError::InternalFailure`] when the guest exports no memory.
	pub(crate) fn of<T>( caller: &mut Caller<'_, T> ) -> HostResult<Self> {
		match caller.get_export( "memory" ) {
			Some( Extern::Memory( memory )) => Ok( Self( memory )),
			_ => {
				tracing::error!( "guest exports no memory" );
				Err( HostError::InternalFailure )
			}
		}
	}

	/// Copies `size` bytes at `ptr` out of the guest.
	///
	/// # Errors
	/// [`HostError::BadArgument`] when the region is not inside the memory.
	pub(crate) fn read( &self, store: impl AsContext, ptr: i32, size: i32 ) -> HostResult<Vec<u8>> {
		let start = address( ptr );
		start.checked_add( address( size ))
			.and_then(| end | self.0.data( &store ).get( start..end ))
			.map( <[u8]>::to_vec )
			.ok_or_else(|| {
				tracing::debug!( ptr, size, "guest region out of bounds" );
				HostError::BadArgument
			})
	}

	/// # Errors
	/// [`HostError::BadArgument`] when the region is not inside the memory.
	pub(crate) fn write( &self, store: impl AsContextMut, ptr: i32, bytes: &[u8] ) -> HostResult<()> {
		self.0.write( store, address( ptr ), bytes ).map_err(|_| HostError::BadArgument )
	}

	/// # Errors
	/// [`HostError::BadArgument`] when `ptr` is not inside the memory.
	pub(crate) fn write_u32( &self, store: impl AsContextMut, ptr: i32, value: u32 ) -> HostResult<()> {
		self.write( store, ptr, &value.to_le_bytes() )
	}

	/// # Errors
	/// [`HostError::BadArgument`] when `ptr` is not inside the memory.
	pub(crate) fn write_u64( &self, store: impl AsContextMut, ptr: i32, value: u64 ) -> HostResult<()> {
		self.write( store, ptr, &value.to_le_bytes() )
	}

}

/// Hands `bytes` to the guest through the `( ptr_ptr, size_ptr )` out-pointers.
///
/// Nothing is allocated for an empty result: the guest receives a null
/// pointer and a zero size.
///
/// # Errors
/// - [`HostError::InternalFailure`] when the guest has no allocator or it fails.
/// - [`HostError::BadArgument`] when an out-pointer is not inside the memory.
pub(crate) fn return_bytes<T>(
	caller: &mut Caller<'_, T>,
	memory: GuestMemory,
	bytes: &[u8],
	ptr_ptr: i32,
	size_ptr: i32,
) -> HostResult<()> {

	let size = u32::try_from( bytes.len() ).map_err(|_| HostError::InternalFailure )?;
	let ptr = match bytes.is_empty() {
		true => 0,
		false => {
			let ptr = allocate( caller, size )?;
			memory.write( &mut *caller, ptr, bytes )?;
			ptr
		}
	};

	memory.write_u32( &mut *caller, ptr_ptr, u32::from_ne_bytes( ptr.to_ne_bytes() ))?;
	memory.write_u32( &mut *caller, size_ptr, size )

}

fn allocate<T>( caller: &mut Caller<'_, T>, size: u32 ) -> HostResult<i32> {

	let allocator = ALLOCATORS.iter()
		.find_map(| name | caller.get_export( name ).and_then( Extern::into_func ))
		.ok_or_else(|| {
			tracing::error!( "guest exports no allocator" );
			HostError::InternalFailure
		})?;

	let ptr = allocator.typed::<i32, i32>( &*caller )
		.and_then(| allocator | allocator.call( &mut *caller, i32::from_ne_bytes( size.to_ne_bytes() )))
		.map_err(| error | {
			tracing::error!( %error, size, "guest allocator failed" );
			HostError::InternalFailure
		})?;

	match ptr {
		0 => Err( HostError::InternalFailure ),
		ptr => Ok( ptr ),
	}

}
