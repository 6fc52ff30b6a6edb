use proxy_wasm_link::{
	Action, BufferType, DispatchError, HeaderMap, HostError, Lifecycle,
	MapType, Phase, StreamKind, StreamState, StreamType,
};

#[test]
fn directions_progress_through_phases() {
	let mut stream = StreamState::new( StreamKind::Http );
	assert_eq!( stream.direction( StreamType::Request ).phase(), Phase::Created );

	assert_eq!( stream.receive_headers( StreamType::Request, HeaderMap::from_pairs([( ":path", "/" )])), 1 );
	assert_eq!( stream.direction( StreamType::Request ).phase(), Phase::HeadersReceived );

	assert_eq!( stream.receive_body( StreamType::Request, b"abc" ), 3 );
	assert_eq!( stream.direction( StreamType::Request ).phase(), Phase::BodyReceived );

	assert_eq!( stream.receive_trailers( StreamType::Request, HeaderMap::new() ), 0 );
	assert_eq!( stream.direction( StreamType::Request ).phase(), Phase::TrailersReceived );
	assert_eq!( stream.direction( StreamType::Response ).phase(), Phase::Created );
}

#[test]
#[should_panic]
fn headers_twice_panics() {
	let mut stream = StreamState::new( StreamKind::Http );
	stream.receive_headers( StreamType::Request, HeaderMap::new() );
	stream.receive_headers( StreamType::Request, HeaderMap::new() );
}

#[test]
#[should_panic]
fn body_after_trailers_panics() {
	let mut stream = StreamState::new( StreamKind::Http );
	stream.receive_trailers( StreamType::Response, HeaderMap::new() );
	stream.receive_body( StreamType::Response, b"late" );
}

#[test]
fn stream_types_must_match_the_kind() {
	let http = StreamState::new( StreamKind::Http );
	let tcp = StreamState::new( StreamKind::Tcp );
	assert_eq!( http.accepts( StreamType::Request ), Ok(()) );
	assert_eq!( http.accepts( StreamType::Downstream ), Err( HostError::BadArgument ));
	assert_eq!( tcp.accepts( StreamType::Upstream ), Ok(()) );
	assert_eq!( tcp.accepts( StreamType::Response ), Err( HostError::BadArgument ));
	assert!( tcp.map( MapType::HttpRequestHeaders ).is_err() );
	assert!( http.buffer( BufferType::DownstreamData ).is_err() );
}

#[test]
fn callout_maps_do_not_belong_to_streams() {
	let stream = StreamState::new( StreamKind::Http );
	assert_eq!( stream.map( MapType::HttpCallResponseHeaders ).err(), Some( HostError::BadArgument ));
	assert_eq!( stream.buffer( BufferType::HttpCallResponseBody ).err(), Some( HostError::BadArgument ));
}

#[test]
fn map_edits_are_visible_through_the_direction() {
	let mut stream = StreamState::new( StreamKind::Http );
	stream.receive_headers( StreamType::Response, HeaderMap::from_pairs([( ":status", "200" )]));
	stream.map_mut( MapType::HttpResponseHeaders ).expect( "http map" ).add( "x-edited", "1" );
	assert_eq!( stream.direction( StreamType::Response ).headers().get( "x-edited" ), Some( "1" ));
}

#[test]
fn resume_continues_and_releases() {
	let mut stream = StreamState::new( StreamKind::Tcp );
	stream.receive_body( StreamType::Downstream, b"abc" );
	stream.settle_body( StreamType::Downstream, Action::Pause );
	assert_eq!( stream.action(), Action::Pause );

	stream.resume( StreamType::Downstream );
	assert_eq!( stream.action(), Action::Continue );
	assert!( stream.direction( StreamType::Downstream ).body().retained().is_empty() );
}

#[test]
fn closed_and_deleted_streams_refuse_events() {
	let mut stream = StreamState::new( StreamKind::Tcp );
	stream.close( StreamType::Upstream );
	assert!( matches!( stream.ensure_open( 7, StreamType::Upstream ), Err( DispatchError::StreamClosed( 7, StreamType::Upstream ))));
	assert!( stream.ensure_open( 7, StreamType::Downstream ).is_ok() );

	stream.mark_completed();
	assert_eq!( stream.lifecycle(), Lifecycle::Completed );
	stream.mark_deleted();
	assert!( stream.is_deleted() );
	assert!( matches!( stream.ensure_open( 7, StreamType::Downstream ), Err( DispatchError::ContextDeleted( 7 ))));
}

#[test]
fn continue_from_headers_or_trailers_releases_that_direction() {
	let mut stream = StreamState::new( StreamKind::Http );
	stream.receive_body( StreamType::Request, b"ab" );
	stream.settle_body( StreamType::Request, Action::Pause );
	stream.receive_body( StreamType::Response, b"xy" );
	stream.settle_body( StreamType::Response, Action::Pause );

	stream.record( StreamType::Request, Action::Continue );

	assert_eq!( stream.action(), Action::Continue );
	assert!( stream.direction( StreamType::Request ).body().retained().is_empty() );
	assert_eq!( stream.direction( StreamType::Response ).body().retained(), b"xy" );
}

#[test]
fn failed_body_callback_keeps_the_chunk() {
	let mut stream = StreamState::new( StreamKind::Http );
	stream.receive_body( StreamType::Request, b"ab" );
	stream.settle_body( StreamType::Request, Action::Pause );
	stream.receive_body( StreamType::Request, b"cd" );

	stream.keep_body( StreamType::Request );

	assert_eq!( stream.action(), Action::Pause );
	assert_eq!( stream.direction( StreamType::Request ).body().retained(), b"abcd" );
	assert_eq!( stream.receive_body( StreamType::Request, b"ef" ), 6 );
	assert_eq!( stream.direction( StreamType::Request ).body().visible(), b"abcdef" );
}
