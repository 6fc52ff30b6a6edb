use proxy_wasm_link::{ read_window, Action, BodyBuffer, HostError };

fn buffer_with( bytes: &[u8] ) -> BodyBuffer {
	let mut buffer = BodyBuffer::default();
	buffer.receive( bytes );
	buffer
}

#[test]
fn paused_bytes_are_prefixed_to_the_next_chunk() {
	let mut buffer = BodyBuffer::default();
	assert_eq!( buffer.receive( b"abc" ), 3 );
	buffer.settle( Action::Pause );
	assert_eq!( buffer.retained(), b"abc" );

	assert_eq!( buffer.receive( b"def" ), 6 );
	assert_eq!( buffer.visible(), b"abcdef" );
	buffer.settle( Action::Continue );
	assert_eq!( buffer.visible(), b"abcdef" );
	assert!( buffer.retained().is_empty() );
}

#[test]
fn continued_chunks_do_not_accumulate() {
	let mut buffer = BodyBuffer::default();
	buffer.receive( b"abc" );
	buffer.settle( Action::Continue );
	buffer.receive( b"def" );
	assert_eq!( buffer.visible(), b"def" );
}

#[test]
fn release_drops_retained_bytes() {
	let mut buffer = buffer_with( b"abc" );
	buffer.settle( Action::Pause );
	buffer.release();
	assert!( buffer.retained().is_empty() );
	assert_eq!( buffer.receive( b"d" ), 1 );
}

#[test]
fn write_at_zero_with_zero_size_prepends() {
	let mut buffer = buffer_with( b"body" );
	assert_eq!( buffer.write( 0, 0, b">>" ), Ok(()) );
	assert_eq!( buffer.visible(), b">>body" );
}

#[test]
fn write_covering_the_buffer_replaces() {
	let mut buffer = buffer_with( b"body" );
	assert_eq!( buffer.write( 0, 4, b"new" ), Ok(()) );
	assert_eq!( buffer.visible(), b"new" );
	assert_eq!( buffer.write( 0, usize::MAX, b"newer" ), Ok(()) );
	assert_eq!( buffer.visible(), b"newer" );
}

#[test]
fn write_past_the_end_appends() {
	let mut buffer = buffer_with( b"body" );
	assert_eq!( buffer.write( 4, 0, b"!" ), Ok(()) );
	assert_eq!( buffer.write( 100, 3, b"?" ), Ok(()) );
	assert_eq!( buffer.visible(), b"body!?" );
}

#[test]
fn any_other_write_is_rejected_and_changes_nothing() {
	let mut buffer = buffer_with( b"body" );
	assert_eq!( buffer.write( 1, 2, b"x" ), Err( HostError::BadArgument ));
	assert_eq!( buffer.write( 0, 2, b"x" ), Err( HostError::BadArgument ));
	assert_eq!( buffer.visible(), b"body" );
}

#[test]
fn every_write_to_an_empty_buffer_lands() {
	let mut buffer = BodyBuffer::default();
	assert_eq!( buffer.write( 0, 0, b"a" ), Ok(()) );
	let mut buffer = BodyBuffer::default();
	assert_eq!( buffer.write( 3, 3, b"b" ), Ok(()) );
	assert_eq!( buffer.visible(), b"b" );
}

#[test]
fn read_window_clamps_to_the_end() {
	assert_eq!( read_window( b"abcdef", 2, 3 ), Ok( b"cde".as_slice() ));
	assert_eq!( read_window( b"abcdef", 4, 100 ), Ok( b"ef".as_slice() ));
	assert_eq!( read_window( b"abcdef", 0, usize::MAX ), Ok( b"abcdef".as_slice() ));
}

#[test]
fn read_window_errors() {
	assert_eq!( read_window( b"", 0, 10 ), Err( HostError::NotFound ));
	assert_eq!( read_window( b"abc", 3, 1 ), Err( HostError::BadArgument ));
}
