//! Per-stream state: the two directions of an HTTP or TCP stream, their
//! phases and body buffers, the latest action and any local response.

use crate::error::{ DispatchError, HostError, HostResult };
use crate::header_map::HeaderMap ;
use crate::types::{ Action, BufferType, MapType, StreamType };



/// Whether a stream carries HTTP messages or raw TCP data.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug )]
pub enum StreamKind { Http, Tcp }

/// How far one direction of a stream has progressed.
///
/// Headers come first, any number of body chunks follow, trailers end the
/// direction. TCP directions only ever see body chunks.
#[derive( Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default )]
pub enum Phase {
	#[default] Created,
	HeadersReceived,
	BodyReceived,
	TrailersReceived,
}

/// Where a stream is in its life as a whole.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default )]
pub enum Lifecycle {
	#[default] Open,
	/// `on_log` has fired.
	Completed,
	/// `on_delete` has fired; the context id is dead.
	Deleted,
}

/// A response the guest generated in place of the upstream one.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct LocalResponse {
	pub status_code: u32,
	pub status_code_detail: String,
	pub body: Vec<u8>,
	pub headers: HeaderMap,
	pub grpc_status: Option<i32>,
}

/// Body bytes of one direction.
///
/// `visible` is what the guest reads and edits during a body callback.
/// `retained` is what a paused stream keeps; the next chunk is appended to it
/// to form the next visible region. Continuing clears the retained region but
/// leaves the visible one in place for inspection.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct BodyBuffer {
	visible: Vec<u8>,
	retained: Vec<u8>,
}

impl BodyBuffer {

	#[inline] pub fn visible( &self ) -> &[u8] { &self.visible }
	#[inline] pub fn retained( &self ) -> &[u8] { &self.retained }

	/// Makes `retained ++ chunk` the visible region and returns its length.
	pub fn receive( &mut self, chunk: &[u8] ) -> usize {
		self.visible.clear();
		self.visible.extend_from_slice( &self.retained );
		self.visible.extend_from_slice( chunk );
		self.visible.len()
	}

	/// Applies the guest's verdict on the visible region.
	pub fn settle( &mut self, action: Action ) { match action {
		Action::Pause => self.visible.clone_into( &mut self.retained ),
		Action::Continue => self.retained.clear(),
	}}

	/// Drops whatever a paused direction was holding.
	#[inline] pub fn release( &mut self ) { self.retained.clear() }

	/// # Errors
	/// See [`read_window`].
	pub fn read( &self, start: usize, max_size: usize ) -> HostResult<&[u8]> {
		read_window( &self.visible, start, max_size )
	}

	/// Edits the visible region.
	///
	/// | `start`        | `max_size`          | effect  |
	/// |----------------|---------------------|---------|
	/// | `0`            | `0`                 | prepend |
	/// | `0`            | `>=` current length | replace |
	/// | `>=` length    | any                 | append  |
	///
	/// # Errors
	/// [`HostError::BadArgument`] for every other combination; the buffer is unchanged.
	pub fn write( &mut self, start: usize, max_size: usize, data: &[u8] ) -> HostResult<()> {
		let len = self.visible.len();
		match ( start, max_size ) {
			( 0, 0 ) => { self.visible.splice( 0..0, data.iter().copied() ); }
			( 0, max_size ) if max_size >= len => data.clone_into( &mut self.visible ),
			( start, _ ) if start >= len => self.visible.extend_from_slice( data ),
			_ => return Err( HostError::BadArgument ),
		}
		Ok(())
	}

}

/// Returns up to `max_size` bytes of `bytes` from `start`.
///
/// # Errors
/// [`HostError::NotFound`] when `bytes` is empty, [`HostError::BadArgument`]
/// when `start` is past its end.
pub fn read_window( bytes: &[u8], start: usize, max_size: usize ) -> HostResult<&[u8]> {
	if bytes.is_empty() { return Err( HostError::NotFound ) }
	if start >= bytes.len() { return Err( HostError::BadArgument ) }
	let end = start.saturating_add( max_size ).min( bytes.len() );
	Ok( &bytes[start..end] )
}

/// One direction of a stream: request or downstream, response or upstream.
#[derive( Debug, Clone, Default )]
pub struct Direction {
	pub(crate) phase: Phase,
	pub(crate) closed: bool,
	pub(crate) headers: HeaderMap,
	pub(crate) trailers: HeaderMap,
	pub(crate) body: BodyBuffer,
}

impl Direction {
	#[inline] pub fn phase( &self ) -> Phase { self.phase }
	#[inline] pub fn is_closed( &self ) -> bool { self.closed }
	#[inline] pub fn headers( &self ) -> &HeaderMap { &self.headers }
	#[inline] pub fn trailers( &self ) -> &HeaderMap { &self.trailers }
	#[inline] pub fn body( &self ) -> &BodyBuffer { &self.body }
}

/// Everything the host tracks for one live stream context.
#[derive( Debug, Clone )]
pub struct StreamState {
	kind: StreamKind,
	lifecycle: Lifecycle,
	action: Action,
	local_response: Option<LocalResponse>,
	inbound: Direction,
	outbound: Direction,
}

impl StreamState {

	pub fn new( kind: StreamKind ) -> Self {
		Self {
			kind,
			lifecycle: Lifecycle::Open,
			action: Action::Continue,
			local_response: None,
			inbound: Direction::default(),
			outbound: Direction::default(),
		}
	}

	#[inline] pub fn kind( &self ) -> StreamKind { self.kind }
	#[inline] pub fn lifecycle( &self ) -> Lifecycle { self.lifecycle }
	#[inline] pub fn action( &self ) -> Action { self.action }
	#[inline] pub fn local_response( &self ) -> Option<&LocalResponse> { self.local_response.as_ref() }
	#[inline] pub fn is_deleted( &self ) -> bool { self.lifecycle == Lifecycle::Deleted }

	/// The direction a stream type names, regardless of the stream's kind.
	pub fn direction( &self, stream: StreamType ) -> &Direction { match stream {
		StreamType::Request | StreamType::Downstream => &self.inbound,
		StreamType::Response | StreamType::Upstream => &self.outbound,
	}}

	fn direction_mut( &mut self, stream: StreamType ) -> &mut Direction { match stream {
		StreamType::Request | StreamType::Downstream => &mut self.inbound,
		StreamType::Response | StreamType::Upstream => &mut self.outbound,
	}}

	/// Checks that `stream` names a direction of this kind of stream.
	///
	/// # Errors
	/// [`HostError::BadArgument`] for a TCP direction on an HTTP stream or vice versa.
	pub fn accepts( &self, stream: StreamType ) -> HostResult<()> {
		match ( self.kind, stream ) {
			( StreamKind::Http, StreamType::Request | StreamType::Response )
			| ( StreamKind::Tcp, StreamType::Downstream | StreamType::Upstream ) => Ok(()),
			_ => Err( HostError::BadArgument ),
		}
	}

	/// Fails when the stream is dead or the guest closed `stream`.
	///
	/// # Errors
	/// [`DispatchError::ContextDeleted`] or [`DispatchError::StreamClosed`].
	pub fn ensure_open( &self, context_id: u32, stream: StreamType ) -> Result<(), DispatchError> {
		if self.is_deleted() { return Err( DispatchError::ContextDeleted( context_id )) }
		match self.direction( stream ).closed {
			true => Err( DispatchError::StreamClosed( context_id, stream )),
			false => Ok(()),
		}
	}

	/// Records newly arrived headers.
	///
	/// # Panics
	/// When the direction already received headers, a body or trailers.
	pub fn receive_headers( &mut self, stream: StreamType, headers: HeaderMap ) -> usize {
		let direction = self.direction_mut( stream );
		assert!( direction.phase == Phase::Created, "{stream} headers after the {:?} phase", direction.phase );
		direction.phase = Phase::HeadersReceived ;
		direction.headers = headers ;
		direction.headers.len()
	}

	/// Merges a body chunk into the visible region and returns its length.
	///
	/// # Panics
	/// When the direction already received trailers.
	pub fn receive_body( &mut self, stream: StreamType, chunk: &[u8] ) -> usize {
		let direction = self.direction_mut( stream );
		assert!( direction.phase != Phase::TrailersReceived, "{stream} body after trailers" );
		direction.phase = Phase::BodyReceived ;
		direction.body.receive( chunk )
	}

	/// Records newly arrived trailers.
	///
	/// # Panics
	/// When the direction already received trailers.
	pub fn receive_trailers( &mut self, stream: StreamType, trailers: HeaderMap ) -> usize {
		let direction = self.direction_mut( stream );
		assert!( direction.phase != Phase::TrailersReceived, "{stream} trailers received twice" );
		direction.phase = Phase::TrailersReceived ;
		direction.trailers = trailers ;
		direction.trailers.len()
	}

	/// Records the action a headers or trailers callback returned for `stream`.
	/// Continuing releases whatever that direction's body was holding.
	pub fn record( &mut self, stream: StreamType, action: Action ) {
		self.action = action ;
		if action == Action::Continue { self.direction_mut( stream ).body.release() }
	}

	/// Records the action a body callback returned and applies it to the buffer.
	pub fn settle_body( &mut self, stream: StreamType, action: Action ) {
		self.action = action ;
		self.direction_mut( stream ).body.settle( action );
	}

	/// A body callback failed: the chunk it was given stays retained for the
	/// next delivery and the action is left as it was.
	pub fn keep_body( &mut self, stream: StreamType ) {
		self.direction_mut( stream ).body.settle( Action::Pause );
	}

	/// `continue_stream`: the stream proceeds and `stream` drops what it held.
	#[inline] pub fn resume( &mut self, stream: StreamType ) { self.record( stream, Action::Continue ) }

	/// `close_stream`: no further events are delivered for `stream`.
	pub fn close( &mut self, stream: StreamType ) {
		self.direction_mut( stream ).closed = true ;
	}

	#[inline] pub fn send_local_response( &mut self, response: LocalResponse ) { self.local_response = Some( response ) }

	pub fn mark_completed( &mut self ) { self.lifecycle = Lifecycle::Completed }
	pub fn mark_deleted( &mut self ) { self.lifecycle = Lifecycle::Deleted }

	/// The header map a map type names.
	///
	/// # Errors
	/// [`HostError::BadArgument`] on a TCP stream or for the callout maps, which
	/// do not belong to a stream.
	pub fn map( &self, map: MapType ) -> HostResult<&HeaderMap> {
		let ( stream, trailers ) = self.map_slot( map )?;
		let direction = self.direction( stream );
		Ok( match trailers { true => &direction.trailers, false => &direction.headers })
	}

	/// # Errors
	/// As [`map`]( Self::map ).
	pub fn map_mut( &mut self, map: MapType ) -> HostResult<&mut HeaderMap> {
		let ( stream, trailers ) = self.map_slot( map )?;
		let direction = self.direction_mut( stream );
		Ok( match trailers { true => &mut direction.trailers, false => &mut direction.headers })
	}

	fn map_slot( &self, map: MapType ) -> HostResult<( StreamType, bool )> {
		let slot = match map {
			MapType::HttpRequestHeaders => ( StreamType::Request, false ),
			MapType::HttpRequestTrailers => ( StreamType::Request, true ),
			MapType::HttpResponseHeaders => ( StreamType::Response, false ),
			MapType::HttpResponseTrailers => ( StreamType::Response, true ),
			MapType::HttpCallResponseHeaders | MapType::HttpCallResponseTrailers => return Err( HostError::BadArgument ),
		};
		self.accepts( slot.0 )?;
		Ok( slot )
	}

	/// The body buffer a buffer type names.
	///
	/// # Errors
	/// [`HostError::BadArgument`] when the buffer belongs to the other kind of
	/// stream or is not a stream buffer at all.
	pub fn buffer( &self, buffer: BufferType ) -> HostResult<&BodyBuffer> {
		let stream = Self::buffer_slot( buffer )?;
		self.accepts( stream )?;
		Ok( &self.direction( stream ).body )
	}

	/// # Errors
	/// As [`buffer`]( Self::buffer ).
	pub fn buffer_mut( &mut self, buffer: BufferType ) -> HostResult<&mut BodyBuffer> {
		let stream = Self::buffer_slot( buffer )?;
		self.accepts( stream )?;
		Ok( &mut self.direction_mut( stream ).body )
	}

	fn buffer_slot( buffer: BufferType ) -> HostResult<StreamType> { match buffer {
		BufferType::HttpRequestBody => Ok( StreamType::Request ),
		BufferType::HttpResponseBody => Ok( StreamType::Response ),
		BufferType::DownstreamData => Ok( StreamType::Downstream ),
		BufferType::UpstreamData => Ok( StreamType::Upstream ),
		BufferType::HttpCallResponseBody
		| BufferType::VmConfiguration
		| BufferType::PluginConfiguration => Err( HostError::BadArgument ),
	}}

}
